use serde::{Deserialize, Serialize};

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
