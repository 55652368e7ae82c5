//! `tgis rename`: rename a space-time dataset within its mapset.

use clap::Args;

use tgis_core::models::{DatasetId, StdsType};
use tgis_core::traits::ITemporalDatabase;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Current name, optionally qualified as name@mapset
    pub from: String,

    /// New name in the same mapset
    pub to: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,
}

pub fn run(ctx: &Context, args: RenameArgs) -> Result<(), CliError> {
    let from = ctx.qualify(&args.from)?;
    // An unqualified new name stays in the dataset's own mapset.
    let to = if args.to.contains('@') {
        ctx.qualify(&args.to)?
    } else {
        DatasetId::new(args.to.as_str(), from.mapset())?
    };
    let stds = ctx.engine.rename_stds(args.stds_type, &from, &to)?;
    println!("Renamed {} <{from}> to <{}>", args.stds_type, stds.id());
    Ok(())
}
