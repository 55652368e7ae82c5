//! `tgis info`: report a map or space-time dataset.

use clap::Args;

use tgis_core::models::DatasetType;
use tgis_core::traits::ITemporalDatabase;
use tgis_core::TgisError;

use crate::context::Context;
use crate::error::CliError;
use crate::report;

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Dataset name, optionally qualified as name@mapset
    pub name: String,

    /// Dataset kind: raster, raster3d, vector, strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub dataset_type: DatasetType,

    /// Print key=value pairs
    #[arg(long, short = 'g', conflicts_with = "json")]
    pub shell: bool,

    /// Print the dataset as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &Context, args: InfoArgs) -> Result<(), CliError> {
    let id = ctx.qualify(&args.name)?;
    let not_found = || TgisError::DatasetNotFound {
        id: format!("{} {id}", args.dataset_type),
    };

    let output = match args.dataset_type {
        DatasetType::Map(map_type) => {
            let map = ctx.engine.select_map(map_type, &id)?.ok_or_else(not_found)?;
            let datasets = ctx.engine.registered_datasets(map_type, &id)?;
            if args.json {
                serde_json::to_string_pretty(&map)?
            } else if args.shell {
                report::map_shell(&map, &datasets)
            } else {
                report::map_info(&map, &datasets)
            }
        }
        DatasetType::Stds(stds_type) => {
            let stds = ctx.engine.select_stds(stds_type, &id)?.ok_or_else(not_found)?;
            if args.json {
                serde_json::to_string_pretty(&stds)?
            } else if args.shell {
                report::stds_shell(&stds)
            } else {
                report::stds_info(&stds)
            }
        }
    };
    print!("{output}");
    if args.json {
        println!();
    }
    Ok(())
}
