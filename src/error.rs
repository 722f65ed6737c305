//! Error types for SCIF

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScifError {
    #[error("{0} is not an installed SCIF app")]
    UnknownApp(String),

    #[error("Entry point is empty")]
    EmptyEntrypoint,

    #[error("Recipe error: {0}")]
    Recipe(String),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScifError>;
