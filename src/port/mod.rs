//! The navigation boundary.
//!
//! Bindings and the runtime never touch a host environment directly;
//! everything goes through [`NavigationPort`]. The shipped
//! [`MemoryHistory`] adapter models a browser history stack and is what
//! tests and demos drive.

mod history;
mod port;

pub use history::MemoryHistory;
pub use port::{ChangeHook, NavigationPort, UpdateMode};
