//! Raw SQL operations over the dataset table families and register tables.

pub mod aggregate_ops;
pub mod base_ops;
pub mod extent_ops;
pub mod map_crud;
pub mod metadata_ops;
pub mod register_ops;
pub mod stds_crud;

use chrono::NaiveDateTime;

use tgis_core::errors::TgisResult;

use crate::schema::TIME_FORMAT;
use crate::to_storage_err;

pub(crate) fn format_time(t: &NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub(crate) fn parse_time(s: &str) -> TgisResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| to_storage_err(format!("bad timestamp {s:?}: {e}")))
}
