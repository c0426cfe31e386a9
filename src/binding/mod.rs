//! Typed bindings over query-string keys.
//!
//! A binding hides serialization and default handling from its
//! consumer: it exposes a plain read/write handle and stays consistent
//! with every other binding on the same key and with browser-style
//! navigation, through the runtime it registered with.

mod binding;

pub use binding::{create_url_state, Options, UrlState};
