use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// The subscriber [`init`] installs, for hosts that want to scope it
/// themselves with [`tracing::subscriber::with_default`].
///
/// Reads the filter from `RUST_LOG`, defaulting to "info".
pub fn subscriber() -> Result<impl Subscriber + Send + Sync + 'static, InitError> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    Ok(tracing_subscriber::registry().with(filter_layer).with(fmt_layer))
}

/// Install a global tracing subscriber for hosts that have none.
///
/// Returns an error instead of panicking if a subscriber is already
/// installed.
pub fn init() -> Result<(), InitError> {
    subscriber()?.try_init()?;
    Ok(())
}
