//! `tgis shift` and `tgis snap`: edit the valid time of a dataset's maps.

use clap::Args;

use tgis_core::models::StdsType;
use tgis_core::traits::ITemporalDatabase;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ShiftArgs {
    /// Space-time dataset, optionally qualified as name@mapset
    pub input: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,

    /// Shift such as "1 day", "-2 months" or "3" for relative time
    #[arg(long, short, allow_hyphen_values = true)]
    pub granularity: String,
}

#[derive(Debug, Args)]
pub struct SnapArgs {
    /// Space-time dataset, optionally qualified as name@mapset
    pub input: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,
}

pub fn run_shift(ctx: &Context, args: ShiftArgs) -> Result<(), CliError> {
    let stds_id = ctx.qualify(&args.input)?;
    let stds = ctx
        .engine
        .shift_stds(args.stds_type, &stds_id, &args.granularity)?;
    println!(
        "Shifted {} map(s) of {} <{stds_id}> by {}",
        stds.derived.number_of_maps, args.stds_type, args.granularity
    );
    Ok(())
}

pub fn run_snap(ctx: &Context, args: SnapArgs) -> Result<(), CliError> {
    let stds_id = ctx.qualify(&args.input)?;
    let stds = ctx.engine.snap_stds(args.stds_type, &stds_id)?;
    println!(
        "Snapped {} map(s) of {} <{stds_id}>",
        stds.derived.number_of_maps, args.stds_type
    );
    Ok(())
}
