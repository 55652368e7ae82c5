//! Subcommand implementations.
//!
//! Each module owns its clap arguments and a `run` handler taking the
//! shared [`Context`](crate::context::Context).

pub mod add;
pub mod common;
pub mod create;
pub mod info;
pub mod init;
pub mod list;
pub mod register;
pub mod relation;
pub mod remove;
pub mod rename;
pub mod shift;
pub mod topology;
pub mod vacuum;
