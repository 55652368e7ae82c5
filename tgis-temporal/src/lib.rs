//! # tgis-temporal
//!
//! Temporal reasoning and the registration workflow for the temporal GIS
//! metadata store: Allen relations between extents, extent validation,
//! granularity, temporal topology of map lists, and the `TemporalEngine`
//! that implements `ITemporalDatabase` over `tgis-storage`.

pub mod engine;
pub mod granularity;
pub mod registration;
pub mod relation;
pub mod topology;
pub mod validation;

pub use engine::TemporalEngine;
pub use relation::{classify_interval, temporal_relation};
