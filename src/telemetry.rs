use std::io::{Error, ErrorKind};
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Json formatted logs on stdout, filtered by `RUST_LOG` and falling back
/// to `env_filter`
pub fn get_subscriber(name: String, env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, std::io::stdout);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs the subscriber globally and forwards `log` records to it.
/// Can only be called once per process.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> std::io::Result<()> {
    LogTracer::init().map_err(|e| Error::new(ErrorKind::Other, e))?;
    set_global_default(subscriber).map_err(|e| Error::new(ErrorKind::Other, e))
}
