//! Terminal-facing log macros.
//!
//! Thin wrappers over `tracing` so every crate logs through the same
//! subscriber. The CLI's formatter turns levels into status symbols;
//! `success!` is an info-level event on its own target so it can be
//! rendered differently from plain progress output.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "nethealth::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
