//! Query-string parsing and encoding.
//!
//! The canonical URI's search component is modelled as an ordered list
//! of key/value pairs so that diffing and minimal rewrites preserve the
//! order a user sees in the address bar.

mod query;

pub use query::Query;
