//! Logging macros that forward to `tracing` only when the *calling* crate
//! enables the matching cargo feature.
//!
//! `cfg!(feature = ...)` is expanded at the call site, so each crate using
//! these macros declares its own `log_info`, `log_warnings`, `log_errors` and
//! `log_debug` features (usually grouped as `standard` / `debug_trace`).
//! Disabled levels compile to nothing in release builds.
//! See similar: https://doc.rust-lang.org/src/std/macros.rs.html#138-145.

#[doc(hidden)]
pub use tracing;

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        if cfg!(feature = "log_info") {
            $crate::tracing::info!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        if cfg!(feature = "log_warnings") {
            $crate::tracing::warn!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        if cfg!(feature = "log_errors") {
            $crate::tracing::error!($($t)*);
        }
    };
}

/// Debug events; also used for trace-level detail since both are only
/// wanted under `debug_trace`.
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        if cfg!(feature = "log_debug") {
            $crate::tracing::debug!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => {
        if cfg!(feature = "log_debug") {
            $crate::tracing::trace!($($t)*);
        }
    };
}
