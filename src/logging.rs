//! Logging initialisation.

use tracing::subscriber::set_global_default as set_subscriber;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LogFormat;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,review_thread=info";

/// Initialise logging / tracing
///
/// The filter is taken from `RUST_LOG`, falling back to warnings for
/// dependencies and info for this crate. Logs go to stderr so they never mix
/// with console progress output. Calling this more than once is harmless;
/// only the first subscriber is installed.
pub fn init(format: LogFormat) {
    let builder = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => set_subscriber(builder.pretty().finish()),
        LogFormat::Compact => set_subscriber(builder.compact().finish()),
        LogFormat::Json => set_subscriber(builder.json().flatten_event(true).finish()),
        LogFormat::Full => set_subscriber(builder.finish()),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already set");
    }
}
