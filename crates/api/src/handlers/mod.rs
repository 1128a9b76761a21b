pub mod designs;
pub mod visual;

use adcraft_db::models::design::Design;
use serde::Serialize;

/// A design row plus its status name (`generating` / `completed`).
#[derive(Debug, Serialize)]
pub struct DesignView {
    #[serde(flatten)]
    pub design: Design,
    pub status: &'static str,
}

impl From<Design> for DesignView {
    fn from(design: Design) -> Self {
        let status = design.status().map(|s| s.name()).unwrap_or("unknown");
        Self { design, status }
    }
}
