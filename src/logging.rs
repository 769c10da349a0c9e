use tracing_subscriber::{EnvFilter, fmt};

use crate::error::AppError;

/// Install the stderr subscriber. `RUST_LOG` wins over the `--debug` flag.
pub(crate) fn init(debug: bool) -> Result<(), AppError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(env_filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
