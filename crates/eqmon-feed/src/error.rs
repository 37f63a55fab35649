//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Unrecognized payload for {source_kind}: {detail}")]
    DataShape {
        source_kind: &'static str,
        detail: String,
    },

    #[error("Invalid number in field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
