//! `tgis vacuum`: drop register tables that no longer list anything.

use crate::context::Context;
use crate::error::CliError;

pub fn run(ctx: &Context) -> Result<(), CliError> {
    let dropped = ctx.engine.drop_empty_register_tables()?;
    for table in &dropped {
        println!("dropped {table}");
    }
    println!("Removed {} empty register table(s)", dropped.len());
    Ok(())
}
