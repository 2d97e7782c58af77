use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `tracing_level` when it is set.
pub fn init_tracing(tracing_level: &str) -> Result<()> {
    let filter_layer = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(tracing_level)
            .map_err(|e| Error::Config(format!("invalid log level {}: {}", tracing_level, e)))?,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Config(e.to_string()))
}
