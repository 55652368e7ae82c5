//! `tgis add`: add a map with its temporal and spatial extent.

use clap::Args;

use tgis_core::models::{
    AbsoluteTime, DatasetBase, MapDataset, MapMetadata, MapType, Projection, Raster3dMetadata,
    RasterMetadata, RelativeTime, SpatialExtent, StdsType, TemporalExtent, VectorMetadata,
};
use tgis_core::traits::ITemporalDatabase;

use super::common::parse_datetime;
use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Map name, optionally qualified as name@mapset
    pub name: String,

    /// Map kind: raster, raster3d or vector
    #[arg(long = "type", default_value = "raster")]
    pub map_type: MapType,

    /// Absolute start time, YYYY-MM-DD[ HH:MM:SS]
    #[arg(long, required_unless_present = "rel_start", conflicts_with = "rel_start")]
    pub start: Option<String>,

    /// Absolute end time; omitted for a time instant
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Timezone offset in hours
    #[arg(long, requires = "start", allow_hyphen_values = true)]
    pub timezone: Option<i32>,

    /// Relative start time, a whole number of `--unit`
    #[arg(long, allow_hyphen_values = true)]
    pub rel_start: Option<i64>,

    /// Relative end time; omitted for a time instant
    #[arg(long, requires = "rel_start", allow_hyphen_values = true)]
    pub rel_end: Option<i64>,

    /// Relative time unit
    #[arg(long, default_value = "days")]
    pub unit: String,

    #[arg(long, allow_hyphen_values = true)]
    pub north: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub south: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub east: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub west: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub top: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub bottom: f64,

    /// Projection tag: XY or LL
    #[arg(long, default_value = "XY")]
    pub proj: Projection,

    #[arg(long)]
    pub nsres: Option<f64>,
    #[arg(long)]
    pub ewres: Option<f64>,
    /// Top-bottom resolution (raster3d)
    #[arg(long)]
    pub tbres: Option<f64>,

    /// Minimum cell value (raster kinds)
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,
    /// Maximum cell value (raster kinds)
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Cell type such as CELL, FCELL or DCELL
    #[arg(long)]
    pub datatype: Option<String>,

    /// Register the new map in this space-time dataset
    #[arg(long)]
    pub register: Option<String>,
}

impl AddArgs {
    fn temporal(&self) -> Result<TemporalExtent, CliError> {
        if let Some(start) = self.rel_start {
            let end = self.rel_end.unwrap_or(start);
            return Ok(RelativeTime::new(start, end, self.unit.as_str()).into());
        }
        let Some(start) = self.start.as_deref() else {
            return Err(CliError::InvalidArgument(
                "either --start or --rel-start is required".to_string(),
            ));
        };
        let start = parse_datetime(start)?;
        let end = match self.end.as_deref() {
            Some(end) => parse_datetime(end)?,
            None => start,
        };
        Ok(AbsoluteTime::new(start, end, self.timezone).into())
    }

    fn spatial(&self) -> SpatialExtent {
        SpatialExtent::new(
            self.north,
            self.south,
            self.east,
            self.west,
            self.top,
            self.bottom,
            self.proj,
        )
    }

    fn metadata(&self, spatial: &SpatialExtent) -> MapMetadata {
        match self.map_type {
            MapType::Raster => {
                let mut meta = match (self.nsres, self.ewres) {
                    (Some(ns), Some(ew)) => RasterMetadata::from_region(spatial, ns, ew),
                    _ => RasterMetadata::default(),
                };
                meta.nsres = meta.nsres.or(self.nsres);
                meta.ewres = meta.ewres.or(self.ewres);
                meta.datatype = self.datatype.clone();
                meta.min = self.min;
                meta.max = self.max;
                MapMetadata::Raster(meta)
            }
            MapType::Raster3d => {
                let mut meta = match (self.nsres, self.ewres, self.tbres) {
                    (Some(ns), Some(ew), Some(tb)) => {
                        Raster3dMetadata::from_region(spatial, ns, ew, tb)
                    }
                    _ => Raster3dMetadata::default(),
                };
                meta.nsres = meta.nsres.or(self.nsres);
                meta.ewres = meta.ewres.or(self.ewres);
                meta.tbres = meta.tbres.or(self.tbres);
                meta.datatype = self.datatype.clone();
                meta.min = self.min;
                meta.max = self.max;
                MapMetadata::Raster3d(meta)
            }
            MapType::Vector => MapMetadata::Vector(VectorMetadata::default()),
        }
    }

    pub fn build(&self, ctx: &Context) -> Result<MapDataset, CliError> {
        let id = ctx.qualify(&self.name)?;
        let spatial = self.spatial();
        let metadata = self.metadata(&spatial);
        Ok(MapDataset::new(
            DatasetBase::new(id, ctx.creator()),
            self.temporal()?,
            spatial,
            metadata,
        ))
    }
}

pub fn run(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    let map = args.build(ctx)?;
    ctx.engine.insert_map(&map)?;
    println!("Added {} <{}>", map.map_type, map.id());

    if let Some(stds) = &args.register {
        let stds_id = ctx.qualify(stds)?;
        let stds_type: StdsType = map.map_type.stds_type();
        ctx.engine.register_map(stds_type, &stds_id, map.id())?;
        println!("Registered <{}> in {stds_type} <{stds_id}>", map.id());
    }
    Ok(())
}
