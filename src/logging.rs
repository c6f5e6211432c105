//! Tracing subscriber setup for the binary.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Later calls are no-ops.
pub fn init_tracing() {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    // another subscriber may already be installed by an embedding program
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
