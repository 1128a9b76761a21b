pub mod brief;
pub mod canvas;
pub mod credits;
pub mod dimensions;
pub mod error;
pub mod hashing;
pub mod imaging;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod types;
