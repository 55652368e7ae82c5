//! `tgis remove`: delete maps or space-time datasets.

use clap::Args;

use tgis_core::models::DatasetType;
use tgis_core::traits::ITemporalDatabase;
use tgis_core::TgisError;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Dataset kind: raster, raster3d, vector, strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub dataset_type: DatasetType,

    /// Datasets to delete
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub names: Vec<String>,
}

pub fn run(ctx: &Context, args: RemoveArgs) -> Result<(), CliError> {
    for name in &args.names {
        let id = ctx.qualify(name)?;
        let removed = match args.dataset_type {
            DatasetType::Map(map_type) => ctx.engine.delete_map(map_type, &id)?,
            DatasetType::Stds(stds_type) => ctx.engine.delete_stds(stds_type, &id)?,
        };
        if !removed {
            return Err(TgisError::DatasetNotFound {
                id: format!("{} {id}", args.dataset_type),
            }
            .into());
        }
        println!("Removed {} <{id}>", args.dataset_type);
    }
    Ok(())
}
