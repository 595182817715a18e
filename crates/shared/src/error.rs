use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the catalog sends alongside non-success statuses, e.g.
/// `{"error":"Episode not found"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page {requested} is out of range 1..={total_pages}")]
    OutOfRange { requested: u32, total_pages: u32 },
}
