use std::sync::Arc;

/// How a query-string rewrite lands in session history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// A new, address-bar-visible history entry. Used for
    /// user-meaningful actions so back/forward can revisit them.
    Push,
    /// An in-place rewrite of the current entry. Used for incidental
    /// synchronization such as default resets.
    Replace,
}

/// Callback installed by the runtime while monitoring is active.
pub type ChangeHook = Arc<dyn Fn() + Send + Sync>;

/// A host's navigation surface, reduced to the query string.
///
/// The runtime observes all writes to the shared URI through this one
/// interface regardless of origin: an adapter must alert the installed
/// hook after any navigation or programmatic history mutation settles.
/// Out-of-band edits that an adapter cannot observe are the poll's job
/// and need no alert.
pub trait NavigationPort: Send + Sync {
    /// The live search string, without a leading `?`. Never cached.
    fn current_search(&self) -> String;

    /// Rewrite the search string through the host's own mutation entry
    /// points, so the write traverses the same monitored path as any
    /// outside caller's.
    fn apply(&self, search: &str, mode: UpdateMode);

    /// Install `hook` to be alerted on every observable change.
    /// Replaces any previously installed hook.
    fn begin_monitor(&self, hook: ChangeHook);

    /// Remove the installed hook, restoring the port to its unmonitored
    /// form with no residue.
    fn end_monitor(&self);
}
