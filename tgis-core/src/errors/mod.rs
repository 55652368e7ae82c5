mod registration_error;
mod storage_error;
mod temporal_error;
mod tgis_error;

pub use registration_error::RegistrationError;
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
pub use tgis_error::{TgisError, TgisResult};
