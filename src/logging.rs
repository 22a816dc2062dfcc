//! Logging bootstrap.

use anyhow::Result;
use flexi_logger::{Logger, LoggerHandle};

/// Start logging to stderr. `RUST_LOG` overrides the default level.
/// The returned handle must stay alive for the process lifetime.
pub fn init(default_level: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(default_level)?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}
