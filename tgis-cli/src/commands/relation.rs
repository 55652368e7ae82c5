//! `tgis relation`: Allen relation between two maps.

use clap::Args;

use tgis_core::models::MapType;
use tgis_core::traits::ITemporalDatabase;
use tgis_core::TgisError;
use tgis_temporal::temporal_relation;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RelationArgs {
    /// Map A
    pub a: String,
    /// Map B
    pub b: String,

    /// Kind of both maps: raster, raster3d or vector
    #[arg(long = "type", default_value = "raster")]
    pub map_type: MapType,
}

pub fn run(ctx: &Context, args: RelationArgs) -> Result<(), CliError> {
    let mut extents = Vec::with_capacity(2);
    for name in [&args.a, &args.b] {
        let id = ctx.qualify(name)?;
        let map = ctx
            .engine
            .select_map(args.map_type, &id)?
            .ok_or_else(|| TgisError::DatasetNotFound {
                id: format!("{} {id}", args.map_type),
            })?;
        extents.push(map.temporal);
    }
    match temporal_relation(&extents[0], &extents[1]) {
        Some(relation) => println!("{relation}"),
        None => println!("none"),
    }
    Ok(())
}
