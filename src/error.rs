use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error("caption error: {0}")]
    Caption(Arc<captions_core::ConvertError>),

    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("JSON serialization error: {0}")]
    Json(Arc<serde_json::Error>),

    #[error("{0}")]
    Custom(String),
}

impl From<captions_core::ConvertError> for AppError {
    fn from(err: captions_core::ConvertError) -> Self {
        Self::Caption(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
