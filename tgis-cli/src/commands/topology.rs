//! `tgis topology`: temporal topology of a space-time dataset.

use clap::Args;

use tgis_core::models::StdsType;
use tgis_core::traits::ITemporalDatabase;
use tgis_temporal::topology::{check_temporal_topology, count_gaps, count_relations, map_time};

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Space-time dataset, optionally qualified as name@mapset
    pub input: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,
}

pub fn run(ctx: &Context, args: TopologyArgs) -> Result<(), CliError> {
    let stds_id = ctx.qualify(&args.input)?;
    let maps = ctx.engine.registered_maps(args.stds_type, &stds_id)?;

    println!("number_of_maps={}", maps.len());
    println!("map_time={}", map_time(&maps));
    println!("number_of_gaps={}", count_gaps(&maps));
    for (relation, count) in count_relations(&maps) {
        println!("{relation}={count}");
    }
    println!("valid_topology={}", check_temporal_topology(&maps));
    Ok(())
}
