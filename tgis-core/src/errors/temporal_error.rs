/// Temporal extent and granularity errors.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("invalid temporal bounds: {0}")]
    InvalidTemporalBounds(String),

    #[error("temporal type mismatch: expected {expected}, found {found}")]
    TemporalTypeMismatch { expected: String, found: String },

    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("relative time unit mismatch: expected {expected}, found {found}")]
    UnitMismatch { expected: String, found: String },

    #[error("immutable field violation: {0}")]
    ImmutableFieldViolation(String),
}
