//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! The pipeline modules (fetcher, uploader, controller) log every cycle, which
//! gets noisy when the CLI is driven from scripts. Each module declares its own
//! switch and routes through these macros instead of calling `log` directly:
//!
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("fetch cycle published {} metrics", count);
//! ```
//!
//! Session tokens must never be passed to these macros.

/// Info-level log, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level counterpart of [`log_info!`].
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Per-metric detail (empty query results, unit mismatches).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
