//! Runtime support for URL-synchronized state.
//!
//! This module provides the coordination singleton that bridges the
//! live query string and every binding subscribed to it.

mod context;

pub use context::{Subscription, UrlRuntime, DEFAULT_POLL_INTERVAL};
