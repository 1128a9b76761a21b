//! Repository layer: one zero-sized struct per table with async query
//! functions taking `&PgPool`.

pub mod ai_usage_repo;
pub mod credit_repo;
pub mod design_repo;
pub mod media_file_repo;
pub mod user_repo;

pub use ai_usage_repo::AiUsageRepo;
pub use credit_repo::CreditRepo;
pub use design_repo::DesignRepo;
pub use media_file_repo::MediaFileRepo;
pub use user_repo::UserRepo;
