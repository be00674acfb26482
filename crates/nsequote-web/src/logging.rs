use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) -> Result<(), ServerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}
