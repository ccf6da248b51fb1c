use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MeditationError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for MeditationError {
    fn from(e: serde_json::Error) -> Self {
        MeditationError::Serialization(e.to_string())
    }
}
