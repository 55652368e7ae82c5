//! `tgis register` and `tgis unregister`.

use clap::Args;

use tgis_core::models::{StdsType, TimeAssignment, TimePoint};
use tgis_core::traits::ITemporalDatabase;

use super::common::parse_datetime;
use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct MapListArgs {
    /// Space-time dataset, optionally qualified as name@mapset
    #[arg(long, short)]
    pub input: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,

    /// Maps to (un)register
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub maps: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub target: MapListArgs,

    /// Valid time of the first map: a date for absolute time, an integer
    /// for relative time
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<String>,

    /// Common end time of all maps
    #[arg(long, requires = "start", conflicts_with = "increment", allow_hyphen_values = true)]
    pub end: Option<String>,

    /// Step between consecutive maps, "1 month" or "5" for relative time
    #[arg(long, requires = "start")]
    pub increment: Option<String>,

    /// Stamp intervals of one increment instead of instants
    #[arg(long, requires = "increment")]
    pub interval: bool,

    /// Unit of relative time, defaults to the dataset's unit
    #[arg(long, requires = "start")]
    pub unit: Option<String>,
}

fn time_point(value: &str) -> Result<TimePoint, CliError> {
    match value.trim().parse::<i64>() {
        Ok(at) => Ok(TimePoint::Relative(at)),
        Err(_) => parse_datetime(value).map(TimePoint::Absolute),
    }
}

impl RegisterArgs {
    pub fn assignment(&self) -> Result<Option<TimeAssignment>, CliError> {
        let Some(start) = self.start.as_deref() else {
            return Ok(None);
        };
        let mut assignment = TimeAssignment::starting_at(time_point(start)?);
        assignment.end = self.end.as_deref().map(time_point).transpose()?;
        assignment.increment = self.increment.clone();
        assignment.interval = self.interval;
        assignment.unit = self.unit.clone();
        Ok(Some(assignment))
    }
}

pub fn run_register(ctx: &Context, args: RegisterArgs) -> Result<(), CliError> {
    let target = &args.target;
    let stds_id = ctx.qualify(&target.input)?;
    let map_ids = target
        .maps
        .iter()
        .map(|name| ctx.qualify(name))
        .collect::<Result<Vec<_>, _>>()?;
    let assignment = args.assignment()?;

    let count =
        ctx.engine
            .register_maps(target.stds_type, &stds_id, &map_ids, assignment.as_ref())?;
    println!(
        "Registered {count} map(s) in {} <{stds_id}>",
        target.stds_type
    );
    Ok(())
}

pub fn run_unregister(ctx: &Context, args: MapListArgs) -> Result<(), CliError> {
    let stds_id = ctx.qualify(&args.input)?;
    for name in &args.maps {
        let map_id = ctx.qualify(name)?;
        ctx.engine.unregister_map(args.stds_type, &stds_id, &map_id)?;
    }
    println!(
        "Unregistered {} map(s) from {} <{stds_id}>",
        args.maps.len(),
        args.stds_type
    );
    Ok(())
}
