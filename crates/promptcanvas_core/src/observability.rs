//! Tracing subscriber setup.

use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when `RUST_LOG` is unset or invalid.
/// Calling this a second time (a host application or a test harness already
/// installed a subscriber) is not an error.
pub fn init_tracing() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
    {
        Ok(()) => {
            info!("Tracing initialized");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, "Global subscriber already set");
            Ok(())
        }
    }
}
