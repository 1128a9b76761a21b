//! Prepaid credit rules.

use crate::error::CoreError;
use crate::types::Credits;

/// Default price of one generated visual.
pub const DEFAULT_VISUAL_CREDIT_COST: Credits = 1;

/// Ledger reason recorded for a visual generation debit.
pub const REASON_AI_VISUAL: &str = "ai_visual";

/// Advisory pre-flight check: is `balance` enough to pay `cost`?
///
/// The authoritative check is the conditional debit at the end of the
/// pipeline; this only avoids calling a provider for an account that
/// clearly cannot pay.
pub fn check_balance(balance: Credits, cost: Credits) -> Result<(), CoreError> {
    if balance < cost {
        return Err(CoreError::InsufficientCredits {
            required: cost,
            available: balance.max(0),
        });
    }
    Ok(())
}
