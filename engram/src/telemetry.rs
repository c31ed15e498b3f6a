//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize structured logging for the engine.
///
/// Reads the `ENGRAM_LOG` environment variable for per-subsystem levels
/// (e.g. `ENGRAM_LOG=engram_storage=debug,engram_retrieval=info`) and
/// falls back to `engram=info` when unset or invalid.
///
/// Idempotent: calling it more than once is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ENGRAM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("engram=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
