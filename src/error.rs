//! Error types for the glucodash application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("cannot summarize an empty set of readings")]
    EmptyInput,

    #[error("remote data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no log entry with id {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
