//! `tgis list`: list datasets of a kind, or the maps of one dataset.

use clap::Args;

use tgis_core::models::{DatasetType, TemporalExtent, TimelineEntry};
use tgis_core::traits::ITemporalDatabase;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Dataset kind: raster, raster3d, vector, strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub dataset_type: DatasetType,

    /// Only datasets of this mapset
    #[arg(long, conflicts_with = "input")]
    pub mapset: Option<String>,

    /// List the maps registered in this space-time dataset instead
    #[arg(long, short)]
    pub input: Option<String>,

    /// Column separator for map listings
    #[arg(long, default_value = "|")]
    pub separator: String,

    /// Show the unregistered time between maps as gap rows
    #[arg(long, requires = "input")]
    pub gaps: bool,
}

fn bounds(extent: &TemporalExtent) -> (String, String) {
    match extent {
        TemporalExtent::Absolute(t) => (t.start.to_string(), t.end.to_string()),
        TemporalExtent::Relative(t) => (t.start.to_string(), t.end.to_string()),
    }
}

pub fn run(ctx: &Context, args: ListArgs) -> Result<(), CliError> {
    if let Some(input) = &args.input {
        let DatasetType::Stds(stds_type) = args.dataset_type else {
            return Err(CliError::InvalidArgument(format!(
                "--input needs a space-time dataset type, got {}",
                args.dataset_type
            )));
        };
        let stds_id = ctx.qualify(input)?;
        let sep = args.separator.as_str();
        println!("id{sep}start_time{sep}end_time");
        if args.gaps {
            for entry in ctx.engine.registered_maps_with_gaps(stds_type, &stds_id)? {
                let (start, end) = bounds(entry.temporal());
                let name = match &entry {
                    TimelineEntry::Map(map) => map.id().to_string(),
                    TimelineEntry::Gap(_) => "None".to_string(),
                };
                println!("{name}{sep}{start}{sep}{end}");
            }
            return Ok(());
        }
        for map in ctx.engine.registered_maps(stds_type, &stds_id)? {
            let (start, end) = bounds(&map.temporal);
            println!("{}{sep}{start}{sep}{end}", map.id());
        }
        return Ok(());
    }

    let mapset = args.mapset.as_deref();
    let ids = match args.dataset_type {
        DatasetType::Map(map_type) => ctx.engine.list_maps(map_type, mapset)?,
        DatasetType::Stds(stds_type) => ctx.engine.list_stds(stds_type, mapset)?,
    };
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
