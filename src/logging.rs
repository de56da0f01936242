//! Process-level tracing setup for the `faqstore` binary.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `debug`
/// or `faqstore=trace`
pub const LOG_ENV: &str = "FAQSTORE_LOG";

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing output on stderr
///
/// `FAQSTORE_LOG` wins over `default_level` (normally `Settings::log_level`).
/// Only the first call has any effect; failures are ignored.
pub fn init(default_level: &str) {
    if INIT.get().is_some() {
        return;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    let _ = INIT.set(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("warn");
        init("not a valid directive ===");
        assert!(INIT.get().is_some());
    }
}
