//! CLI error handling with user-facing messages and exit codes.

use std::path::PathBuf;
use std::process;

use tgis_core::TgisError;

/// Errors surfaced to the user by the `tgis` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Database(#[from] TgisError),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Print the error to stderr and exit with code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {self}");
        if let CliError::Database(TgisError::RegistrationError(_)) = self {
            eprintln!();
            eprintln!("Maps and space-time datasets must share mapset and temporal type,");
            eprintln!("and a dataset only registers maps of its own kind.");
        }
        process::exit(1)
    }
}
