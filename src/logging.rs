//! Tracing subscriber setup.
//!
//! The level comes from `RUST_LOG`, defaulting to `info`:
//!
//! ```bash
//! RUST_LOG=senda=debug cargo run --example basic
//! ```

use tracing_subscriber::EnvFilter;

/// Installs a formatted stdout subscriber. Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call finds a global subscriber already set; keep the first.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
