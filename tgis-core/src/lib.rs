//! # tgis-core
//!
//! Foundation crate for the temporal GIS metadata store.
//! Dataset models, temporal and spatial extents, errors, configuration,
//! and the `ITemporalDatabase` trait implemented by `tgis-temporal`.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::TgisConfig;
pub use errors::{TgisError, TgisResult};
