use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TierlineError {
    #[error("failed to load grading profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid grading profile: {0}")]
    ProfileInvalid(String),

    #[error("unknown preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("failed to parse vendor metrics: {0}")]
    ParseError(String),

    #[error("unsupported input format '{0}'. Expected a .json or .csv file")]
    UnsupportedInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
