use std::sync::{Arc, Mutex};

use super::{ChangeHook, NavigationPort, UpdateMode};

struct HistoryInner {
    /// Search strings only; the rest of the URI never changes here.
    entries: Vec<String>,
    index: usize,
}

/// An in-memory session history.
///
/// Models the three ways a real address bar changes:
///
/// - [`back`](MemoryHistory::back) / [`forward`](MemoryHistory::forward)
///   are browser-initiated navigation and alert the monitor hook;
/// - [`push_state`](MemoryHistory::push_state) /
///   [`replace_state`](MemoryHistory::replace_state) are programmatic
///   history mutations; while monitored they alert the hook after the
///   mutation settles, standing in for wrapped history entry points;
/// - [`set_search_untracked`](MemoryHistory::set_search_untracked) is an
///   out-of-band edit no event reveals, visible only to the poll.
///
/// # Examples
///
/// ```
/// use urlstate::MemoryHistory;
///
/// let history = MemoryHistory::with_search("xP=6");
/// history.push_state("xP=4");
/// assert_eq!(history.search(), "xP=4");
/// assert!(history.back());
/// assert_eq!(history.search(), "xP=6");
/// ```
pub struct MemoryHistory {
    inner: Mutex<HistoryInner>,
    monitor: Mutex<Option<ChangeHook>>,
}

impl MemoryHistory {
    pub fn new() -> Arc<Self> {
        Self::with_search("")
    }

    /// A fresh history whose single entry carries `search`.
    pub fn with_search(search: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(HistoryInner {
                entries: vec![normalize(search)],
                index: 0,
            }),
            monitor: Mutex::new(None),
        })
    }

    /// Append a new entry, discarding any forward entries.
    pub fn push_state(&self, search: &str) {
        {
            let mut inner = self.inner.lock().unwrap();
            let index = inner.index;
            inner.entries.truncate(index + 1);
            inner.entries.push(normalize(search));
            inner.index += 1;
        }
        self.alert();
    }

    /// Rewrite the current entry in place.
    pub fn replace_state(&self, search: &str) {
        {
            let mut inner = self.inner.lock().unwrap();
            let index = inner.index;
            inner.entries[index] = normalize(search);
        }
        self.alert();
    }

    /// Navigate one entry back. Returns false at the oldest entry.
    pub fn back(&self) -> bool {
        let moved = {
            let mut inner = self.inner.lock().unwrap();
            if inner.index == 0 {
                false
            } else {
                inner.index -= 1;
                true
            }
        };
        if moved {
            self.alert();
        }
        moved
    }

    /// Navigate one entry forward. Returns false at the newest entry.
    pub fn forward(&self) -> bool {
        let moved = {
            let mut inner = self.inner.lock().unwrap();
            if inner.index + 1 >= inner.entries.len() {
                false
            } else {
                inner.index += 1;
                true
            }
        };
        if moved {
            self.alert();
        }
        moved
    }

    /// Mutate the current entry without telling anyone. Only the
    /// runtime's poll can notice this.
    pub fn set_search_untracked(&self, search: &str) {
        let mut inner = self.inner.lock().unwrap();
        let index = inner.index;
        inner.entries[index] = normalize(search);
    }

    /// The current entry's search string.
    pub fn search(&self) -> String {
        let inner = self.inner.lock().unwrap();
        inner.entries[inner.index].clone()
    }

    /// Number of entries in the stack, never less than one.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    /// Whether a monitor hook is currently installed.
    pub fn is_monitored(&self) -> bool {
        self.monitor.lock().unwrap().is_some()
    }

    fn alert(&self) {
        let hook = self.monitor.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl NavigationPort for MemoryHistory {
    fn current_search(&self) -> String {
        self.search()
    }

    fn apply(&self, search: &str, mode: UpdateMode) {
        match mode {
            UpdateMode::Push => self.push_state(search),
            UpdateMode::Replace => self.replace_state(search),
        }
    }

    fn begin_monitor(&self, hook: ChangeHook) {
        *self.monitor.lock().unwrap() = Some(hook);
    }

    fn end_monitor(&self) {
        *self.monitor.lock().unwrap() = None;
    }
}

fn normalize(search: &str) -> String {
    search.strip_prefix('?').unwrap_or(search).to_string()
}
