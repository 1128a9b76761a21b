//! AI visual generation pipeline.

pub mod orchestrator;
pub mod store;

pub use orchestrator::{GenerationPath, PipelineSettings, VisualOutcome, VisualPipeline};
pub use store::{GenerationStore, PgGenerationStore};
