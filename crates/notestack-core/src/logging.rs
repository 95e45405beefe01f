//! Tracing subscriber setup.
//!
//! Set `NOTESTACK_DEBUG_LOG` to a file path to capture debug output there;
//! otherwise `RUST_LOG` (default `warn`) controls stderr output.

use tracing_subscriber::EnvFilter;

pub const DEBUG_LOG_ENV: &str = "NOTESTACK_DEBUG_LOG";

/// Install the global subscriber. Calling it again is a no-op.
pub fn init() -> std::io::Result<()> {
    if let Ok(log_path) = std::env::var(DEBUG_LOG_ENV) {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let _ = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(log_file))
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .try_init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
    Ok(())
}
