//! Logging setup.
//!
//! The subscriber is installed before the configuration is read so that
//! config load warnings are reported. The filter sits behind a reload layer:
//! `RUST_LOG` wins when set, otherwise the configured `log_filter` replaces
//! the `info` bootstrap filter once the config is known.

use caret_trail_config::TrailConfig;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Filter used until the configuration has been loaded.
const BOOTSTRAP_FILTER: &str = "info";

/// Handle for swapping the active filter after startup.
pub struct LogFilterHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilterHandle {
    /// Applies the configured filter unless `RUST_LOG` took precedence.
    pub fn apply_config(&self, config: &TrailConfig) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.handle.reload(EnvFilter::new(&config.log_filter)) {
            tracing::warn!("Failed to apply log filter '{}': {e}", config.log_filter);
        }
    }
}

/// Installs the global subscriber, writing to stderr.
pub fn init() -> LogFilterHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(BOOTSTRAP_FILTER), false),
    };
    let (subscriber, handle) = build(filter, std::io::stderr, true);
    subscriber.init();
    LogFilterHandle { handle, from_env }
}

fn build<W>(
    filter: EnvFilter,
    make_writer: W,
    ansi: bool,
) -> (
    impl Subscriber + Send + Sync + 'static,
    reload::Handle<EnvFilter, Registry>,
)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer).with_ansi(ansi));
    (subscriber, handle)
}
