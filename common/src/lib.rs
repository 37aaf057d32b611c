pub mod config;
pub mod error;
pub mod model;
pub mod probing;

mod macros;

// The log macros expand to `$crate::tracing::...` so callers do not
// need their own path to the subscriber machinery.
pub use tracing;
