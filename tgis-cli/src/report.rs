//! Human readable and shell style dataset reports.

use std::fmt::{Display, Write};

use tgis_core::models::{
    DatasetBase, DatasetId, MapDataset, MapMetadata, SpaceTimeDataset, SpatialExtent, StdsType,
    TemporalExtent, TemporalRange,
};

const WIDTH: usize = 78;

fn header(out: &mut String, title: &str) {
    let lead = format!(" +{} {title} ", "-".repeat(20));
    let fill = WIDTH.saturating_sub(lead.chars().count());
    let _ = writeln!(out, "{lead}{}+", "-".repeat(fill));
}

fn blank(out: &mut String) {
    let _ = writeln!(out, " |{}|", " ".repeat(WIDTH - 2));
}

fn footer(out: &mut String) {
    let _ = writeln!(out, " +{}+", "-".repeat(WIDTH - 2));
}

fn field(out: &mut String, label: &str, value: impl Display) {
    let _ = writeln!(out, " | {:.<28} {value}", format!("{label}:"));
}

fn shell(out: &mut String, key: &str, value: impl Display) {
    let _ = writeln!(out, "{key}={value}");
}

fn opt<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string)
}

fn join(ids: &[DatasetId]) -> String {
    if ids.is_empty() {
        return "None".to_string();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn stds_title(stds_type: StdsType) -> &'static str {
    match stds_type {
        StdsType::Strds => "Space Time Raster Dataset",
        StdsType::Str3ds => "Space Time 3D Raster Dataset",
        StdsType::Stvds => "Space Time Vector Dataset",
    }
}

fn base_info(out: &mut String, base: &DatasetBase, temporal_type: impl Display) {
    header(out, "Basic information");
    field(out, "Id", &base.id);
    field(out, "Name", base.id.name());
    field(out, "Mapset", base.id.mapset());
    field(out, "Creator", &base.creator);
    field(out, "Temporal type", temporal_type);
    field(out, "Creation time", base.creation_time);
    field(out, "Modification time", base.modification_time);
    field(out, "Revision", base.revision);
}

fn base_shell(out: &mut String, base: &DatasetBase, temporal_type: impl Display) {
    shell(out, "id", &base.id);
    shell(out, "name", base.id.name());
    shell(out, "mapset", base.id.mapset());
    shell(out, "creator", &base.creator);
    shell(out, "temporal_type", temporal_type);
    shell(out, "creation_time", format!("'{}'", base.creation_time));
    shell(out, "modification_time", format!("'{}'", base.modification_time));
    shell(out, "revision", base.revision);
}

fn bounds(extent: Option<&SpatialExtent>) -> [(&'static str, &'static str, String); 6] {
    let value = |v: Option<f64>| v.map_or_else(|| "None".to_string(), |v| v.to_string());
    [
        ("North", "north", value(extent.map(|e| e.north))),
        ("South", "south", value(extent.map(|e| e.south))),
        ("East", "east", value(extent.map(|e| e.east))),
        ("West", "west", value(extent.map(|e| e.west))),
        ("Top", "top", value(extent.map(|e| e.top))),
        ("Bottom", "bottom", value(extent.map(|e| e.bottom))),
    ]
}

fn spatial_info(out: &mut String, extent: Option<&SpatialExtent>) {
    header(out, "Spatial extent");
    for (label, _, value) in bounds(extent) {
        field(out, label, value);
    }
}

fn spatial_shell(out: &mut String, extent: Option<&SpatialExtent>) {
    for (_, key, value) in bounds(extent) {
        shell(out, key, value);
    }
}

/// Report of a map and the datasets it is registered in.
pub fn map_info(map: &MapDataset, datasets: &[DatasetId]) -> String {
    let mut out = String::new();
    header(&mut out, &format!("Map: {}", map.map_type));
    blank(&mut out);
    base_info(&mut out, &map.base, map.temporal_type());

    match &map.temporal {
        TemporalExtent::Absolute(t) => {
            header(&mut out, "Absolute time");
            field(&mut out, "Start time", t.start);
            field(&mut out, "End time", t.end);
            field(&mut out, "Timezone", opt(&t.timezone));
        }
        TemporalExtent::Relative(t) => {
            header(&mut out, "Relative time");
            field(&mut out, "Start time", t.start);
            field(&mut out, "End time", t.end);
            field(&mut out, "Relative time unit", &t.unit);
        }
    }
    spatial_info(&mut out, Some(&map.spatial));

    header(&mut out, "Metadata information");
    match &map.metadata {
        MapMetadata::Raster(m) => {
            field(&mut out, "Datatype", opt(&m.datatype));
            field(&mut out, "Number of columns", opt(&m.cols));
            field(&mut out, "Number of rows", opt(&m.rows));
            field(&mut out, "Number of cells", opt(&m.number_of_cells));
            field(&mut out, "North-South resolution", opt(&m.nsres));
            field(&mut out, "East-west resolution", opt(&m.ewres));
            field(&mut out, "Minimum value", opt(&m.min));
            field(&mut out, "Maximum value", opt(&m.max));
        }
        MapMetadata::Raster3d(m) => {
            field(&mut out, "Datatype", opt(&m.datatype));
            field(&mut out, "Number of columns", opt(&m.cols));
            field(&mut out, "Number of rows", opt(&m.rows));
            field(&mut out, "Number of depths", opt(&m.depths));
            field(&mut out, "Number of cells", opt(&m.number_of_cells));
            field(&mut out, "North-South resolution", opt(&m.nsres));
            field(&mut out, "East-west resolution", opt(&m.ewres));
            field(&mut out, "Top-Bottom resolution", opt(&m.tbres));
            field(&mut out, "Minimum value", opt(&m.min));
            field(&mut out, "Maximum value", opt(&m.max));
        }
        MapMetadata::Vector(_) => {}
    }
    field(&mut out, "Registered datasets", join(datasets));
    footer(&mut out);
    out
}

pub fn map_shell(map: &MapDataset, datasets: &[DatasetId]) -> String {
    let mut out = String::new();
    base_shell(&mut out, &map.base, map.temporal_type());
    match &map.temporal {
        TemporalExtent::Absolute(t) => {
            shell(&mut out, "start_time", format!("'{}'", t.start));
            shell(&mut out, "end_time", format!("'{}'", t.end));
            shell(&mut out, "timezone", opt(&t.timezone));
        }
        TemporalExtent::Relative(t) => {
            shell(&mut out, "start_time", t.start);
            shell(&mut out, "end_time", t.end);
            shell(&mut out, "unit", &t.unit);
        }
    }
    spatial_shell(&mut out, Some(&map.spatial));
    match &map.metadata {
        MapMetadata::Raster(m) => {
            shell(&mut out, "datatype", opt(&m.datatype));
            shell(&mut out, "cols", opt(&m.cols));
            shell(&mut out, "rows", opt(&m.rows));
            shell(&mut out, "number_of_cells", opt(&m.number_of_cells));
            shell(&mut out, "nsres", opt(&m.nsres));
            shell(&mut out, "ewres", opt(&m.ewres));
            shell(&mut out, "min", opt(&m.min));
            shell(&mut out, "max", opt(&m.max));
        }
        MapMetadata::Raster3d(m) => {
            shell(&mut out, "datatype", opt(&m.datatype));
            shell(&mut out, "cols", opt(&m.cols));
            shell(&mut out, "rows", opt(&m.rows));
            shell(&mut out, "depths", opt(&m.depths));
            shell(&mut out, "number_of_cells", opt(&m.number_of_cells));
            shell(&mut out, "nsres", opt(&m.nsres));
            shell(&mut out, "ewres", opt(&m.ewres));
            shell(&mut out, "tbres", opt(&m.tbres));
            shell(&mut out, "min", opt(&m.min));
            shell(&mut out, "max", opt(&m.max));
        }
        MapMetadata::Vector(_) => {}
    }
    shell(&mut out, "registered_datasets", join(datasets));
    out
}

/// Report of a space-time dataset with its derived view.
pub fn stds_info(stds: &SpaceTimeDataset) -> String {
    let d = &stds.derived;
    let mut out = String::new();
    header(&mut out, stds_title(stds.stds_type));
    blank(&mut out);
    base_info(&mut out, &stds.base, stds.temporal_type);
    field(&mut out, "Semantic type", &stds.semantic_type);

    match &d.temporal_range {
        Some(TemporalRange::Absolute { start, end }) => {
            header(&mut out, "Absolute time");
            field(&mut out, "Start time", start);
            field(&mut out, "End time", end);
        }
        Some(TemporalRange::Relative { start, end }) => {
            header(&mut out, "Relative time");
            field(&mut out, "Start time", start);
            field(&mut out, "End time", end);
            field(&mut out, "Relative time unit", opt(&stds.relative_unit));
        }
        None => {
            header(&mut out, "Temporal extent");
            field(&mut out, "Start time", "None");
            field(&mut out, "End time", "None");
        }
    }
    field(&mut out, "Granularity", opt(&stds.granularity));
    spatial_info(&mut out, d.spatial.as_ref());

    header(&mut out, "Metadata information");
    field(&mut out, "Number of registered maps", d.number_of_maps);
    if stds.stds_type != StdsType::Stvds {
        field(&mut out, "North-South resolution min", opt(&d.nsres_min));
        field(&mut out, "North-South resolution max", opt(&d.nsres_max));
        field(&mut out, "East-west resolution min", opt(&d.ewres_min));
        field(&mut out, "East-west resolution max", opt(&d.ewres_max));
        if stds.stds_type == StdsType::Str3ds {
            field(&mut out, "Top-Bottom resolution min", opt(&d.tbres_min));
            field(&mut out, "Top-Bottom resolution max", opt(&d.tbres_max));
        }
        field(&mut out, "Minimum value min", opt(&d.min_min));
        field(&mut out, "Minimum value max", opt(&d.min_max));
        field(&mut out, "Maximum value min", opt(&d.max_min));
        field(&mut out, "Maximum value max", opt(&d.max_max));
    }
    field(&mut out, "Register table", opt(&stds.map_register));
    field(&mut out, "Title", opt(&stds.title));
    field(&mut out, "Description", opt(&stds.description));
    footer(&mut out);
    out
}

pub fn stds_shell(stds: &SpaceTimeDataset) -> String {
    let d = &stds.derived;
    let mut out = String::new();
    base_shell(&mut out, &stds.base, stds.temporal_type);
    shell(&mut out, "semantic_type", &stds.semantic_type);
    match &d.temporal_range {
        Some(TemporalRange::Absolute { start, end }) => {
            shell(&mut out, "start_time", format!("'{start}'"));
            shell(&mut out, "end_time", format!("'{end}'"));
        }
        Some(TemporalRange::Relative { start, end }) => {
            shell(&mut out, "start_time", start);
            shell(&mut out, "end_time", end);
            shell(&mut out, "unit", opt(&stds.relative_unit));
        }
        None => {
            shell(&mut out, "start_time", "None");
            shell(&mut out, "end_time", "None");
        }
    }
    shell(&mut out, "granularity", format!("'{}'", opt(&stds.granularity)));
    spatial_shell(&mut out, d.spatial.as_ref());
    shell(&mut out, "number_of_maps", d.number_of_maps);
    if stds.stds_type != StdsType::Stvds {
        shell(&mut out, "nsres_min", opt(&d.nsres_min));
        shell(&mut out, "nsres_max", opt(&d.nsres_max));
        shell(&mut out, "ewres_min", opt(&d.ewres_min));
        shell(&mut out, "ewres_max", opt(&d.ewres_max));
        if stds.stds_type == StdsType::Str3ds {
            shell(&mut out, "tbres_min", opt(&d.tbres_min));
            shell(&mut out, "tbres_max", opt(&d.tbres_max));
        }
        shell(&mut out, "min_min", opt(&d.min_min));
        shell(&mut out, "min_max", opt(&d.min_max));
        shell(&mut out, "max_min", opt(&d.max_min));
        shell(&mut out, "max_max", opt(&d.max_max));
    }
    shell(&mut out, "map_register", opt(&stds.map_register));
    out
}
