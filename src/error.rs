//! Error types for material-intensity

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntensityError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No template flow for {role}: expected {criteria}")]
    MissingTemplate { role: String, criteria: String },

    #[error("Invalid method artifact: {0}")]
    InvalidArtifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
