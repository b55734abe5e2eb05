//! Conditional logging macros.
//!
//! When the `tracing` feature is enabled, these re-export `tracing` macros.
//! When disabled, they expand to no-ops for zero runtime overhead.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_fields_and_messages() {
        let path = std::path::Path::new("section.html");
        crate::log::debug!(path = %path.display(), bytes = 12, "document written");
        crate::log::warn!(every = 0, "tick interval clamped");
        crate::log::debug!("plain message");
    }
}
