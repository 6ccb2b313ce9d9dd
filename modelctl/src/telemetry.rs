//! Tracing initialization (fmt subscriber with env-based filtering).
//!
//! Log verbosity is controlled through `RUST_LOG` using the usual
//! `tracing_subscriber::EnvFilter` syntax, defaulting to `info` when unset:
//!
//! ```bash
//! RUST_LOG=modelctl=debug,sqlx=warn modelctl
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; a second call returns an error from
/// `try_init`, which callers can treat as fatal.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
