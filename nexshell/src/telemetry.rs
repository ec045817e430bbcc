//! Tracing initialization (fmt subscriber + `RUST_LOG`-style filtering).
//!
//! Log output goes to stderr so that command output on stdout stays clean
//! for piping. The default filter is `warn` for the same reason; raise it
//! with e.g. `RUST_LOG=nexshell=debug`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber for the shell.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
