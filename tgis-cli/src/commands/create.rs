//! `tgis create`: create a space-time dataset.

use clap::Args;

use tgis_core::models::{DatasetBase, SpaceTimeDataset, StdsType, TemporalType};
use tgis_core::traits::ITemporalDatabase;

use crate::context::Context;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Dataset name, optionally qualified as name@mapset
    pub name: String,

    /// Dataset kind: strds, str3ds or stvds
    #[arg(long = "type", default_value = "strds")]
    pub stds_type: StdsType,

    /// absolute or relative
    #[arg(long, default_value = "absolute")]
    pub temporal_type: TemporalType,

    /// Semantic type, defaults to the configured one
    #[arg(long)]
    pub semantic_type: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Initial granularity such as "1 day" (computed on registration)
    #[arg(long)]
    pub granularity: Option<String>,

    /// Unit of a relative dataset, otherwise taken from the first map
    #[arg(long)]
    pub unit: Option<String>,
}

pub fn run(ctx: &Context, args: CreateArgs) -> Result<(), CliError> {
    let id = ctx.qualify(&args.name)?;
    let semantic_type = args
        .semantic_type
        .unwrap_or_else(|| ctx.config.temporal.default_semantic_type.clone());

    let mut stds = SpaceTimeDataset::new(
        args.stds_type,
        DatasetBase::new(id.clone(), ctx.creator()),
        args.temporal_type,
        semantic_type,
    );
    stds.title = args.title;
    stds.description = args.description;
    stds.granularity = args.granularity;
    stds.relative_unit = args.unit;

    ctx.engine.insert_stds(&stds)?;
    println!("Created {} <{id}>", args.stds_type);
    Ok(())
}
