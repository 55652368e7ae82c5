//! Tracing subscriber setup for the `tgis` binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tgis_core::config::ObservabilityConfig;

use crate::error::CliError;

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays parseable. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) -> Result<(), CliError> {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .map_err(|e| CliError::LoggingInit(format!("bad log level {default_level:?}: {e}")))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| CliError::LoggingInit(e.to_string()))
}
