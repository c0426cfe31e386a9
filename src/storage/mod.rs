//! Durable key/value persistence with local-storage semantics.
//!
//! Every failure is swallowed: a read that fails is `None`, a write
//! that fails is a no-op. Features built on a backend degrade to
//! session-only state when persistence is unavailable.

mod storage;

pub use storage::{FileStorage, MemoryStorage, StorageBackend};
