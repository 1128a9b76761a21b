//! Subscription plans and their entitlements.
//!
//! Plan names must match the values stored in `users.plan`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const PLAN_FREE: &str = "free";
pub const PLAN_STARTER: &str = "starter";
pub const PLAN_PRO: &str = "pro";
pub const PLAN_BUSINESS: &str = "business";

/// Subscription tier of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Starter,
    Pro,
    Business,
}

impl Plan {
    /// Parse a stored plan name. Unknown values fall back to [`Plan::Free`]
    /// so a bad row can never unlock paid features.
    pub fn from_db(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            PLAN_STARTER => Self::Starter,
            PLAN_PRO => Self::Pro,
            PLAN_BUSINESS => Self::Business,
            _ => Self::Free,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => PLAN_FREE,
            Self::Starter => PLAN_STARTER,
            Self::Pro => PLAN_PRO,
            Self::Business => PLAN_BUSINESS,
        }
    }

    /// Whether the plan may generate AI visuals.
    pub fn allows_ai_visual(self) -> bool {
        !matches!(self, Self::Free)
    }

    /// Fail with [`CoreError::PlanRequired`] unless AI visuals are included.
    pub fn require_ai_visual(self) -> Result<(), CoreError> {
        if self.allows_ai_visual() {
            Ok(())
        } else {
            Err(CoreError::PlanRequired(
                "AI visual generation requires a paid plan. Upgrade to Starter or above.".into(),
            ))
        }
    }
}
