//! Tracing setup for the command-line tools.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Per-run log trails are separate and travel inside each
//! `ScrapingResult`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Output goes to stderr so result
/// JSON on stdout stays machine-readable. Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).try_init().ok();
    }
}
