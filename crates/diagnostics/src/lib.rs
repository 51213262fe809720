//! Logging facade shared by the storefs crates
//!
//! Usage:
//! - Set STOREFS_LOG=off (default) - no logs
//! - Set STOREFS_LOG=info - one line per put/get/upload with key and size
//! - Set STOREFS_LOG=debug - also container creation and write-back syncs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "STOREFS_LOG";

static INIT: Once = Once::new();

/// Parsed value of `STOREFS_LOG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSetting {
    Off,
    Level(emit::Level),
    /// Unrecognized value, logged at info
    Unknown,
}

/// Map a `STOREFS_LOG` value to a setting. Matching is case-insensitive.
#[must_use]
pub fn parse_log_setting(value: &str) -> LogSetting {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => LogSetting::Off,
        "debug" => LogSetting::Level(emit::Level::Debug),
        "info" => LogSetting::Level(emit::Level::Info),
        "warn" => LogSetting::Level(emit::Level::Warn),
        "error" => LogSetting::Level(emit::Level::Error),
        _ => LogSetting::Unknown,
    }
}

/// Initialize diagnostics based on the STOREFS_LOG environment variable
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let level = match parse_log_setting(&value) {
            LogSetting::Off => return,
            LogSetting::Level(level) => level,
            LogSetting::Unknown => emit::Level::Info,
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if parse_log_setting(&value) == LogSetting::Unknown {
            emit::warn!("unknown {env} value {value}, using info", env: LOG_ENV, value: value.as_str());
        }

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

/// Detailed diagnostics: keys, sizes, resolved paths
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Normal operations a user may want to see
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Recoverable problems, e.g. a failed backend request returned to the caller
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Serious failures
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
