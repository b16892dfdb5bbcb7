//! Expiring Map shell
//!
//! Reads map commands from stdin and answers each with one JSON line on
//! stdout. Logs go to stderr.

use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiring_map::{Config, Shell};

/// Main entry point for the expiring map shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the map with the configured TTL
/// 4. Serve commands until stdin is closed
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expiring_map=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting expiring map shell");

    let config = Config::from_env();
    info!("Configuration loaded: ttl={}ms", config.ttl_ms);

    let mut shell = Shell::from_config(&config).context("Failed to create expiring map")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let answered = shell
        .run(stdin.lock(), stdout.lock())
        .context("Shell session failed")?;

    info!("Shell finished after {} commands", answered);
    Ok(())
}
