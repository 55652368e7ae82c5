//! `tgis init`: create the temporal database and report where it lives.

use crate::context::Context;
use crate::error::CliError;

pub fn run(ctx: &Context) -> Result<(), CliError> {
    let storage = ctx.engine.storage();
    match storage.path() {
        Some(path) => println!("Temporal database: {}", path.display()),
        None => println!("Temporal database: in memory"),
    }
    println!("Schema version:    {}", storage.schema_version()?);
    println!("Mapset:            {}", ctx.mapset);
    Ok(())
}
