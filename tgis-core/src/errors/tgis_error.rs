use super::{RegistrationError, StorageError, TemporalError};

/// Top-level error type for the temporal GIS store.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum TgisError {
    #[error("dataset not found: {id}")]
    DatasetNotFound { id: String },

    #[error("dataset already exists: {id}")]
    DatasetExists { id: String },

    #[error("invalid identifier <{ident}>: {reason}")]
    InvalidIdentifier { ident: String, reason: String },

    #[error("invalid dataset type: {type_name}")]
    InvalidType { type_name: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("temporal error: {0}")]
    TemporalError(#[from] TemporalError),

    #[error("registration error: {0}")]
    RegistrationError(#[from] RegistrationError),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

/// Convenience type alias.
pub type TgisResult<T> = Result<T, TgisError>;
