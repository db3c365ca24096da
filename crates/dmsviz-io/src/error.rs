use dmsviz_core::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request to the RCSB failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse structure {}: {}", .path.display(), .messages.join("; "))]
    Structure { path: PathBuf, messages: Vec<String> },

    #[error("{} does not contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
}
