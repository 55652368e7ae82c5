//! Table naming for the per-kind table families and the register tables.
//!
//! Register table names are built from validated dataset identifiers and
//! always quoted when spliced into SQL.

use tgis_core::models::{DatasetId, DatasetType, MapType, StdsType};

/// Format used for every timestamp column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn base_table(kind: impl Into<DatasetType>) -> String {
    format!("{}_base", kind.into().as_str())
}

pub fn absolute_time_table(kind: impl Into<DatasetType>) -> String {
    format!("{}_absolute_time", kind.into().as_str())
}

pub fn relative_time_table(kind: impl Into<DatasetType>) -> String {
    format!("{}_relative_time", kind.into().as_str())
}

pub fn spatial_extent_table(kind: impl Into<DatasetType>) -> String {
    format!("{}_spatial_extent", kind.into().as_str())
}

pub fn metadata_table(kind: impl Into<DatasetType>) -> String {
    format!("{}_metadata", kind.into().as_str())
}

/// Column in `<map>_metadata` holding the map's register table name.
pub fn map_register_column(map_type: MapType) -> String {
    format!("{}_register", map_type.stds_type().as_str())
}

/// Column in `<stds>_metadata` holding the dataset's register table name.
pub fn stds_register_column(stds_type: StdsType) -> String {
    format!("{}_register", stds_type.map_type().as_str())
}

/// `<map_name>_<map_mapset>_<stds_type>_register`: the datasets a map belongs to.
pub fn map_register_table(map_type: MapType, map_id: &DatasetId) -> String {
    format!(
        "{}_{}_{}_register",
        map_id.name(),
        map_id.mapset(),
        map_type.stds_type().as_str()
    )
}

/// `<stds_name>_<stds_mapset>_<map_type>_register`: the maps of a dataset.
pub fn stds_register_table(stds_type: StdsType, stds_id: &DatasetId) -> String {
    format!(
        "{}_{}_{}_register",
        stds_id.name(),
        stds_id.mapset(),
        stds_type.map_type().as_str()
    )
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_families() {
        assert_eq!(base_table(MapType::Raster), "raster_base");
        assert_eq!(absolute_time_table(StdsType::Strds), "strds_absolute_time");
        assert_eq!(metadata_table(MapType::Raster3d), "raster3d_metadata");
        assert_eq!(map_register_column(MapType::Vector), "stvds_register");
        assert_eq!(stds_register_column(StdsType::Str3ds), "raster3d_register");
    }

    #[test]
    fn register_table_names() {
        let map = DatasetId::parse("precip_2001@climate").unwrap();
        let stds = DatasetId::parse("precip@climate").unwrap();
        assert_eq!(
            map_register_table(MapType::Raster, &map),
            "precip_2001_climate_strds_register"
        );
        assert_eq!(
            stds_register_table(StdsType::Strds, &stds),
            "precip_climate_raster_register"
        );
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_ident("a.b-c"), "\"a.b-c\"");
        assert_eq!(quote_ident("x\"y"), "\"x\"\"y\"");
    }
}
