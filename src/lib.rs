//! # Urlstate
//!
//! URL-synchronized reactive state for Rust.
//!
//! Urlstate keeps many independent pieces of UI state consistent with a
//! shared query string, so views are shareable links and browser-style
//! navigation restores them. Two levels of abstraction:
//!
//! ## Bindings (Low-level primitives)
//!
//! Typed handles over individual query-string keys:
//! - `UrlState<T>` - Read/write state mirrored into one key
//! - `Codec<T>` - Serialization between a value and its raw query form
//! - `UrlRuntime` - Coordination singleton that detects every way the
//!   query string can change (navigation, programmatic history calls,
//!   out-of-band edits) and fans changes out per key
//!
//! ## Grid (High-level estimation tool)
//!
//! The numeric-estimation grid built on those bindings:
//! - `GridView` - One binding per grid control, restorable from a URI
//! - `EstimationStore` - Recorded estimates with durable persistence
//! - Error/accuracy summaries and recurring-decimal display formatting

pub mod binding;
pub mod codec;
pub mod estimation;
pub mod format;
pub mod grid;
pub mod port;
pub mod query;
pub mod runtime;
pub mod storage;

// Re-export main types for convenience
pub use binding::{create_url_state, Options, UrlState};
pub use codec::{Codec, Coordinate, CoordsCodec, DecodeError, JsonCodec};
pub use estimation::{factorable, summary_rows, EstimationStore, Estimations, SummaryRow};
pub use format::{limit_recurring_decimals, limit_recurring_decimals_str, remove_fluff};
pub use grid::{Cell, CellToggle, GridSpec, GridView};
pub use port::{MemoryHistory, NavigationPort, UpdateMode};
pub use query::Query;
pub use runtime::UrlRuntime;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        UrlRuntime::scope(|| {
            let x_positive = create_url_state("xP", 5);
            assert_eq!(x_positive.get(), 5);
            x_positive.set(42);
            assert_eq!(x_positive.get(), 42);
        });
    }
}
