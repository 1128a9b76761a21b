//! Visual generation orchestrator.
//!
//! Runs one brief from plan check to stored PNG. Held in
//! [`AppState`](crate::state::AppState) as an `Arc<VisualPipeline>`.

use std::sync::Arc;

use adcraft_core::brief::{ReferenceImage, VisualBrief, VisualBriefInput};
use adcraft_core::credits::{check_balance, REASON_AI_VISUAL};
use adcraft_core::error::CoreError;
use adcraft_core::hashing::sha256_hex;
use adcraft_core::imaging::{post_process, LogoOverlay, PostProcessOptions, PostProcessOutcome};
use adcraft_core::prompt::{compose_edit_prompt, compose_prompt, PromptContext};
use adcraft_core::provider::ProviderKind;
use adcraft_core::types::{Credits, DbId};
use adcraft_db::models::ai_usage::{CreateAiUsage, FEATURE_AI_VISUAL, FEATURE_LOGO_VISION};
use adcraft_db::models::design::{CreateDesign, Design};
use adcraft_db::models::media_file::{CreateMediaFile, MediaFile, SOURCE_AI_VISUAL};
use adcraft_providers::{
    BrandNameDetector, ImageInput, NameCheck, ProviderSet, SizeOptions, SourceResolver,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::pipeline::store::GenerationStore;
use crate::storage::{design_key, FileStorage};

const PNG_MIME: &str = "image/png";

/// Knobs that come from server configuration.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub credit_cost: Credits,
    pub trim_borders: bool,
}

/// Which provider call a brief maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPath {
    /// Change an existing design in place.
    Edit,
    /// Image-to-image from a subject photo or layout template.
    Reference,
    /// Plain text-to-image.
    Generate,
}

impl GenerationPath {
    pub fn for_brief(brief: &VisualBrief) -> Self {
        if brief.edit_image_url.is_some() {
            Self::Edit
        } else if brief.reference.is_some() {
            Self::Reference
        } else {
            Self::Generate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Reference => "reference",
            Self::Generate => "generate",
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct VisualOutcome {
    pub design: Design,
    pub media_file: MediaFile,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub warnings: Vec<String>,
}

/// Orchestrates a single visual generation.
///
/// Manages the full lifecycle:
/// 1. Load the account and check the plan.
/// 2. Validate the brief and check the balance.
/// 3. Create the design record (generating).
/// 4. Build the prompt and call the selected provider.
/// 5. Post-process and store the PNG.
/// 6. Complete the design, debit credits, record media and usage.
pub struct VisualPipeline {
    store: Arc<dyn GenerationStore>,
    storage: Arc<dyn FileStorage>,
    providers: ProviderSet,
    sources: SourceResolver,
    vision: Arc<dyn BrandNameDetector>,
    settings: PipelineSettings,
}

impl VisualPipeline {
    pub fn new(
        store: Arc<dyn GenerationStore>,
        storage: Arc<dyn FileStorage>,
        providers: ProviderSet,
        sources: SourceResolver,
        vision: Arc<dyn BrandNameDetector>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            storage,
            providers,
            sources,
            vision,
            settings,
        }
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Generate one visual for `user_id`.
    ///
    /// Failures before the design record exists leave no trace. Failures
    /// after it leave the design in `Generating`; credits are only debited
    /// once the PNG is stored.
    pub async fn generate(&self, user_id: DbId, input: VisualBriefInput) -> AppResult<VisualOutcome> {
        let cost = self.settings.credit_cost;

        // 1. Load account.
        let account = self
            .store
            .find_account(user_id)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("Account not found".into()))?;

        // 2. Plan gate.
        account.plan().require_ai_visual()?;

        // 3. Validate brief.
        let mut brief = input.validate()?;

        // 4. Advisory credit gate. The debit in step 13 is the binding one.
        check_balance(account.credit_balance, cost)?;

        // 5. Non-default providers must be configured.
        let provider = self.providers.select(brief.provider);
        if !brief.provider.is_default() && !provider.is_available() {
            return Err(AppError::BadRequest(format!(
                "{} is not configured",
                brief.provider.label()
            )));
        }
        let path = GenerationPath::for_brief(&brief);
        let model = match path {
            GenerationPath::Generate => provider.model(),
            GenerationPath::Edit | GenerationPath::Reference => provider.edit_model(),
        };

        // 6. Create design record (status: generating).
        let design = self
            .store
            .create_design(&CreateDesign {
                user_id,
                prompt: brief.prompt.clone(),
                category: brief.category.clone(),
                size: brief.size.to_string(),
                style: brief.style.clone(),
                metadata: json!({
                    "provider": brief.provider.name(),
                    "model": model,
                    "pipeline": path.as_str(),
                }),
            })
            .await?;
        tracing::info!(
            user_id,
            design_id = design.id,
            provider = %brief.provider,
            pipeline = path.as_str(),
            "Visual generation started"
        );

        let mut warnings = Vec::new();

        // 7. Logo: fetch once, used by the vision check and the composite.
        //    The edit path keeps whatever logo the prior design already has.
        let logo = match (&brief.brand.logo, path) {
            (Some(source), GenerationPath::Generate | GenerationPath::Reference) => {
                match self.sources.fetch(source).await {
                    Ok(logo) => Some(logo),
                    Err(e) => {
                        tracing::warn!(design_id = design.id, error = %e, "Logo unavailable, skipping");
                        warnings.push(format!("Logo skipped: {e}"));
                        None
                    }
                }
            }
            _ => None,
        };
        if logo.is_none() {
            brief.brand.logo = None;
        }

        // 8. Compose prompt and resolve provider inputs.
        let size = SizeOptions::for_provider(brief.provider, brief.size);
        let result = match path {
            GenerationPath::Edit => {
                let target = brief.edit_image_url.as_deref().unwrap_or_default();
                let prior = self.fetch_source(design.id, target).await?;
                let prompt = compose_edit_prompt(&brief.prompt, brief.size);
                provider.edit_image(&prompt, &prior, &size).await
            }
            GenerationPath::Reference => {
                let reference_src = brief
                    .reference
                    .as_ref()
                    .map(ReferenceImage::source)
                    .unwrap_or_default();
                let reference = self.fetch_source(design.id, reference_src).await?;
                let prompt = self.full_prompt(user_id, design.id, &brief, logo.as_ref()).await;
                provider.edit_image(&prompt, &reference, &size).await
            }
            GenerationPath::Generate => {
                let prompt = self.full_prompt(user_id, design.id, &brief, logo.as_ref()).await;
                provider.generate_image(&prompt, &size).await
            }
        };

        // 9. Decode provider output.
        let encoded = match result {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                return Err(self.generation_failed(
                    design.id,
                    format!("{} returned no image", brief.provider.label()),
                ));
            }
            Err(e) => return Err(self.generation_failed(design.id, e.to_string())),
        };
        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| self.generation_failed(design.id, format!("invalid base64 image: {e}")))?;

        // 10. Post-process off the async runtime.
        let options = PostProcessOptions {
            target: brief.size,
            trim_borders: self.settings.trim_borders,
            logo: logo.map(|logo| LogoOverlay {
                bytes: logo.bytes,
                size_percent: brief.logo_size_percent,
            }),
        };
        let processed = tokio::task::spawn_blocking(move || post_process(&raw, &options))
            .await
            .map_err(|e| AppError::InternalError(format!("Post-processing task failed: {e}")))?
            .map_err(|e| self.generation_failed(design.id, e.to_string()))?;
        warnings.extend(processed.warnings.iter().cloned());

        // 11. Store PNG.
        let stored = self
            .storage
            .put_png(&design_key(user_id, design.id), &processed.png)
            .await
            .map_err(|e| self.generation_failed(design.id, e.to_string()))?;

        // 12. Complete design.
        let design = self
            .store
            .complete_design(design.id, &stored.url, &completion_metadata(&processed))
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Design {} was no longer generating", design.id))
            })?;

        // 13. Debit credits. A zero price writes no ledger row.
        let credits_remaining = if cost == 0 {
            self.store
                .current_balance(user_id)
                .await?
                .unwrap_or(account.credit_balance)
        } else {
            let Some(entry) = self
                .store
                .debit_credits(user_id, design.id, cost, REASON_AI_VISUAL)
                .await?
            else {
                let available = self.store.current_balance(user_id).await?.unwrap_or(0);
                tracing::warn!(user_id, design_id = design.id, cost, available, "Debit refused");
                return Err(CoreError::InsufficientCredits {
                    required: cost,
                    available,
                }
                .into());
            };
            entry.balance_after
        };

        // 14. Media library row.
        let media_file = self
            .store
            .record_media(&CreateMediaFile {
                user_id,
                design_id: Some(design.id),
                url: stored.url.clone(),
                file_name: stored.file_name().to_string(),
                mime_type: PNG_MIME.to_string(),
                width: processed.width as i32,
                height: processed.height as i32,
                size_bytes: stored.size_bytes as i64,
                checksum_sha256: sha256_hex(&processed.png),
                source: SOURCE_AI_VISUAL.to_string(),
            })
            .await?;

        // 15. Usage audit (best-effort).
        self.record_usage_best_effort(CreateAiUsage {
            user_id,
            feature: FEATURE_AI_VISUAL.to_string(),
            provider: brief.provider.name().to_string(),
            model: model.to_string(),
            design_id: Some(design.id),
            metadata: json!({
                "size": brief.size.to_string(),
                "pipeline": path.as_str(),
                "creditsUsed": cost,
            }),
        })
        .await;

        tracing::info!(
            user_id,
            design_id = design.id,
            credits_remaining,
            "Visual generation completed"
        );

        Ok(VisualOutcome {
            design,
            media_file,
            credits_used: cost,
            credits_remaining,
            warnings,
        })
    }

    /// Full prompt, running the brand-name vision check when it matters.
    async fn full_prompt(
        &self,
        user_id: DbId,
        design_id: DbId,
        brief: &VisualBrief,
        logo: Option<&ImageInput>,
    ) -> String {
        let brand_name_in_logo = match (logo, brief.brand.name.as_deref()) {
            (Some(logo), Some(name)) if brief.brand.show_name => {
                let check = self.vision.logo_contains_name(logo, name).await;
                // Only a model answer is billable usage.
                if let NameCheck::Answered(present) = check {
                    self.record_usage_best_effort(CreateAiUsage {
                        user_id,
                        feature: FEATURE_LOGO_VISION.to_string(),
                        provider: ProviderKind::OpenAi.name().to_string(),
                        model: self.vision.model().to_string(),
                        design_id: Some(design_id),
                        metadata: json!({ "brandName": name, "nameInLogo": present }),
                    })
                    .await;
                }
                check.name_present()
            }
            _ => false,
        };

        compose_prompt(&PromptContext {
            brief,
            brand_name_in_logo,
        })
    }

    async fn fetch_source(&self, design_id: DbId, source: &str) -> AppResult<ImageInput> {
        self.sources
            .fetch(source)
            .await
            .map_err(|e| self.generation_failed(design_id, format!("source image: {e}")))
    }

    async fn record_usage_best_effort(&self, usage: CreateAiUsage) {
        if let Err(e) = self.store.record_usage(&usage).await {
            tracing::warn!(
                user_id = usage.user_id,
                feature = %usage.feature,
                error = %e,
                "Failed to record AI usage"
            );
        }
    }

    fn generation_failed(&self, design_id: DbId, cause: String) -> AppError {
        tracing::error!(design_id, error = %cause, "Visual generation failed, design left generating");
        AppError::Generation(cause)
    }
}

fn completion_metadata(processed: &PostProcessOutcome) -> serde_json::Value {
    json!({
        "sourceWidth": processed.source_width,
        "sourceHeight": processed.source_height,
        "resized": processed.resized,
        "trimmed": processed.trimmed,
        "logo": processed.logo.map(|p| json!({
            "x": p.x,
            "y": p.y,
            "width": p.width,
            "height": p.height,
        })),
    })
}
