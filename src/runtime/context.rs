use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use crate::port::{ChangeHook, MemoryHistory, NavigationPort, UpdateMode};
use crate::query::Query;

/// Poll cadence for out-of-band edits. A heuristic trade-off between
/// responsiveness and overhead; override it with
/// [`UrlRuntime::with_poll_interval`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

type KeyCallback = Arc<dyn Fn(Option<String>) + Send + Sync>;

/// Registry and monitoring state. `baseline` is `Some` exactly while
/// monitoring is ACTIVE; it always holds the last search string the
/// runtime reconciled against.
struct MonitorState {
    // Map from key to that key's subscribers, in subscription order
    registry: HashMap<String, Vec<(usize, KeyCallback)>>,
    subscriber_count: usize,
    baseline: Option<String>,
    // Bumped on every activation and deactivation so stale poll
    // threads notice and exit
    poll_epoch: usize,
}

struct RuntimeInner {
    port: Arc<dyn NavigationPort>,
    poll_interval: Duration,
    state: Mutex<MonitorState>,
}

impl RuntimeInner {
    /// The single convergence routine for all three change channels.
    ///
    /// Compares the live search string against the baseline, moves the
    /// baseline first, then notifies only the keys whose parameter
    /// value actually changed. Running it twice with no intervening
    /// change delivers nothing the second time.
    fn reconcile(&self) {
        let live = self.port.current_search();
        let pending: Vec<(String, usize, Option<String>)> = {
            let mut state = self.state.lock().unwrap();
            let Some(baseline) = state.baseline.clone() else {
                return;
            };
            if baseline == live {
                return;
            }
            let old = Query::parse(&baseline);
            let new = Query::parse(&live);
            state.baseline = Some(live.clone());

            let mut pending = Vec::new();
            for (key, subscribers) in &state.registry {
                let old_value = old.get(key);
                let new_value = new.get(key);
                if old_value != new_value {
                    for (id, _) in subscribers {
                        pending.push((key.clone(), *id, new_value.map(str::to_string)));
                    }
                }
            }
            pending
        };
        if !pending.is_empty() {
            tracing::debug!(deliveries = pending.len(), "query string changed");
        }
        for (key, id, value) in pending {
            self.deliver(&key, id, value);
        }
    }

    /// Invoke one subscriber, re-checking the registry immediately
    /// before the call so an unsubscribe that happened after detection
    /// suppresses the delivery.
    fn deliver(&self, key: &str, id: usize, value: Option<String>) {
        let callback = {
            let state = self.state.lock().unwrap();
            state.registry.get(key).and_then(|subscribers| {
                subscribers
                    .iter()
                    .find(|(sub_id, _)| *sub_id == id)
                    .map(|(_, cb)| Arc::clone(cb))
            })
        };
        if let Some(callback) = callback {
            callback(value);
        }
    }

    /// Notify every subscriber of `key`, in subscription order.
    fn notify_key(&self, key: &str, value: Option<&str>) {
        let ids: Vec<usize> = {
            let state = self.state.lock().unwrap();
            state
                .registry
                .get(key)
                .map(|subscribers| subscribers.iter().map(|(id, _)| *id).collect())
                .unwrap_or_default()
        };
        for id in ids {
            self.deliver(key, id, value.map(str::to_string));
        }
    }

    fn remove_subscriber(&self, key: &str, id: usize) {
        let deactivate = {
            let mut state = self.state.lock().unwrap();
            if let Some(subscribers) = state.registry.get_mut(key) {
                let before = subscribers.len();
                subscribers.retain(|(sub_id, _)| *sub_id != id);
                let removed = subscribers.len() < before;
                let is_empty = subscribers.is_empty();
                if removed {
                    state.subscriber_count -= 1;
                }
                if is_empty {
                    state.registry.remove(key);
                }
            }
            if state.subscriber_count == 0 && state.baseline.is_some() {
                state.baseline = None;
                state.poll_epoch += 1;
                true
            } else {
                false
            }
        };
        if deactivate {
            self.port.end_monitor();
            tracing::debug!("monitoring idle: last subscriber removed");
        }
    }
}

/// The coordination singleton: one authoritative bridge between the
/// live query string and all bindings.
///
/// A runtime tracks, per key, the set of currently-interested bindings,
/// detects query-string changes through every channel (navigation
/// events, programmatic history mutations, and a poll for out-of-band
/// edits), and fans each key's new value out to its subscribers. It
/// begins monitoring lazily when the first subscriber registers and
/// returns to idle when the last one drops.
///
/// Like the rest of the crate, runtimes support both a global default
/// and scoped instances for isolation.
///
/// # Examples
///
/// Scoped runtime over a fresh in-memory history:
///
/// ```
/// use urlstate::UrlRuntime;
///
/// UrlRuntime::scope(|| {
///     let runtime = UrlRuntime::current();
///     assert_eq!(runtime.current_value("xP"), None);
/// });
/// // Runtime and all of its subscriptions are gone here
/// ```
///
/// Injecting a history to drive navigation:
///
/// ```
/// use urlstate::{MemoryHistory, UpdateMode, UrlRuntime};
///
/// let history = MemoryHistory::with_search("xP=6");
/// let runtime = UrlRuntime::new(history.clone());
/// assert_eq!(runtime.current_value("xP").as_deref(), Some("6"));
///
/// runtime.update_url("xP", Some("4"), UpdateMode::Push);
/// assert_eq!(history.search(), "xP=4");
/// ```
pub struct UrlRuntime {
    next_id: AtomicUsize,
    inner: Arc<RuntimeInner>,
}

// Thread-local stack for scoped runtimes
thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<UrlRuntime>>> = RefCell::new(vec![]);
}

impl UrlRuntime {
    /// Create a runtime over `port` with the default poll interval.
    pub fn new(port: Arc<dyn NavigationPort>) -> Arc<Self> {
        Self::with_poll_interval(port, DEFAULT_POLL_INTERVAL)
    }

    /// Create a runtime over `port` polling at `poll_interval`.
    pub fn with_poll_interval(port: Arc<dyn NavigationPort>, poll_interval: Duration) -> Arc<Self> {
        Arc::new(UrlRuntime {
            next_id: AtomicUsize::new(0),
            inner: Arc::new(RuntimeInner {
                port,
                poll_interval,
                state: Mutex::new(MonitorState {
                    registry: HashMap::new(),
                    subscriber_count: 0,
                    baseline: None,
                    poll_epoch: 0,
                }),
            }),
        })
    }

    /// Run a function with a fresh isolated runtime over a fresh
    /// in-memory history.
    ///
    /// Useful for testing or creating isolated contexts. The runtime
    /// and all its subscriptions are cleaned up when the function
    /// returns.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(MemoryHistory::new()), f)
    }

    /// Get or create the global runtime (fallback).
    ///
    /// The global runtime owns its own in-memory history; hosts with a
    /// real navigation surface should create a runtime over their own
    /// port and enter it with [`with_runtime`](Self::with_runtime).
    pub fn global() -> Arc<Self> {
        static RUNTIME: OnceLock<Arc<UrlRuntime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(|| Self::new(MemoryHistory::new())))
    }

    /// Get the current runtime (scoped or global fallback).
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(Self::global)
        })
    }

    /// Run a function with a specific runtime as the current context.
    ///
    /// Pushes the runtime onto the thread-local stack for the duration
    /// of the function execution.
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().push(runtime);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Register `callback` for `key`. Activates monitoring if this is
    /// the first subscriber overall. Dropping the returned
    /// [`Subscription`] removes exactly this callback and deactivates
    /// monitoring if the registry becomes empty.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(Option<String>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let activate_epoch = {
            let mut state = self.inner.state.lock().unwrap();
            state
                .registry
                .entry(key.to_string())
                .or_default()
                .push((id, Arc::new(callback)));
            state.subscriber_count += 1;
            if state.subscriber_count == 1 {
                state.baseline = Some(self.inner.port.current_search());
                state.poll_epoch += 1;
                Some(state.poll_epoch)
            } else {
                None
            }
        };

        if let Some(epoch) = activate_epoch {
            let hook: ChangeHook = {
                let weak = Arc::downgrade(&self.inner);
                Arc::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.reconcile();
                    }
                })
            };
            self.inner.port.begin_monitor(hook);
            spawn_poll(Arc::downgrade(&self.inner), epoch, self.inner.poll_interval);
            tracing::debug!(
                interval_ms = self.inner.poll_interval.as_millis() as u64,
                "monitoring active: first subscriber"
            );
        }

        Subscription {
            key: key.to_string(),
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// The raw (still-serialized) value for `key` in the live query
    /// string. A pure read of the port, never a cached baseline.
    pub fn current_value(&self, key: &str) -> Option<String> {
        Query::parse(&self.inner.port.current_search())
            .get(key)
            .map(str::to_string)
    }

    /// Set or remove one key in the query string, then synchronously
    /// notify every subscriber of that key, in subscription order,
    /// before returning.
    ///
    /// An absent or empty `value` removes the key. The baseline moves
    /// before the port is touched, so the port's own change alert
    /// reconciles to a no-op rather than double-notifying.
    pub fn update_url(&self, key: &str, value: Option<&str>, mode: UpdateMode) {
        let value = value.filter(|v| !v.is_empty());
        let live = self.inner.port.current_search();
        let mut query = Query::parse(&live);
        match value {
            Some(v) => query.set(key, v),
            None => query.remove(key),
        }
        let next = query.encode();

        {
            let mut state = self.inner.state.lock().unwrap();
            if state.baseline.is_some() {
                state.baseline = Some(next.clone());
            }
        }
        self.inner.port.apply(&next, mode);
        self.inner.notify_key(key, value);
    }

    /// Force a reconciliation pass, exactly as the poll does.
    pub fn reconcile(&self) {
        self.inner.reconcile();
    }
}

fn spawn_poll(inner: Weak<RuntimeInner>, epoch: usize, interval: Duration) {
    thread::Builder::new()
        .name("urlstate-poll".to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            let Some(inner) = inner.upgrade() else {
                break;
            };
            {
                let state = inner.state.lock().unwrap();
                if state.poll_epoch != epoch || state.baseline.is_none() {
                    break;
                }
            }
            inner.reconcile();
        })
        .expect("failed to spawn poll thread");
}

/// RAII guard for a key subscription.
pub struct Subscription {
    key: String,
    id: usize,
    inner: Weak<RuntimeInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_subscriber(&self.key, self.id);
        }
    }
}
