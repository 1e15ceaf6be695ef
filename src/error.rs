use std::io;
use thiserror::Error;

// Custom error type for the fixture generators
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    Logger(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, FixtureError>;
