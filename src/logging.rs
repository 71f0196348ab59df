// src/logging.rs
// =============================================================================
// Sets up `tracing` output.
//
// Logs go to stderr so that stdout stays clean for tables and --json. The
// level comes from --log-level / REPO_BROWSER_LOG and applies to this crate
// only; a RUST_LOG value, when present, replaces the whole filter.
// =============================================================================

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Builds the filter directive for a bare level like "debug".
pub fn directive(level: &str) -> String {
    format!("repo_browser={}", level.trim().to_ascii_lowercase())
}

/// Installs the global subscriber. Later calls do nothing.
pub fn init(level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive(level)))
            .unwrap_or_else(|_| EnvFilter::new("repo_browser=warn"));

        // An already-installed subscriber (e.g. from a test harness) wins
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
