use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Text extraction failed for '{document}': {reason}")]
    ExtractionFailed { document: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
