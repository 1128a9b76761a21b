//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts

pub mod ai_usage;
pub mod credit;
pub mod design;
pub mod media_file;
pub mod status;
pub mod user;
