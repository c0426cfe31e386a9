use std::sync::{Arc, RwLock};

use crate::codec::{Codec, JsonCodec};
use crate::port::UpdateMode;
use crate::runtime::{Subscription, UrlRuntime};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Per-binding behavior flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Rewrite the current history entry instead of pushing a new one.
    pub replace: bool,
    /// Keep writes that have no query representation (a `None`, a
    /// `NaN`) instead of substituting the default. Only coherent for
    /// bindings whose default *is* the nullish value, e.g. an
    /// `Option<T>` defaulting to `None`: the key removal re-resolves
    /// every subscriber (the writer included) to the default.
    pub allow_nullish: bool,
}

/// A typed read/write handle bound to one query-string key.
///
/// The value is cached locally and kept current by the runtime: a write
/// through any binding for the key, a back/forward navigation, or an
/// out-of-band query edit all land in this binding's cache before the
/// triggering call returns (or, for polled edits, within one poll
/// tick). Cloning shares the cache and the subscription; dropping the
/// last clone unsubscribes.
///
/// A raw value that fails to decode never surfaces an error; the
/// binding degrades to its default. Writing a value whose encoding
/// equals the encoded default removes the key, keeping shareable URIs
/// minimal.
///
/// # Examples
///
/// ```
/// use urlstate::{UrlRuntime, UrlState};
///
/// UrlRuntime::scope(|| {
///     let x_positive = UrlState::new("xP", 6);
///     assert_eq!(x_positive.get(), 6);
///
///     x_positive.set(9);
///     assert_eq!(x_positive.get(), 9);
///     assert_eq!(
///         UrlRuntime::current().current_value("xP").as_deref(),
///         Some("9"),
///     );
///
///     // Writing the default back removes the key entirely
///     x_positive.set(6);
///     assert_eq!(UrlRuntime::current().current_value("xP"), None);
/// });
/// ```
pub struct UrlState<T> {
    key: String,
    default: Arc<T>,
    codec: Arc<dyn Codec<T>>,
    options: Options,
    value: Arc<RwLock<T>>,
    runtime: Arc<UrlRuntime>,
    _subscription: Arc<Subscription>,
}

impl<T> Clone for UrlState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            default: Arc::clone(&self.default),
            codec: Arc::clone(&self.codec),
            options: self.options,
            value: Arc::clone(&self.value),
            runtime: Arc::clone(&self.runtime),
            _subscription: Arc::clone(&self._subscription),
        }
    }
}

impl<T> UrlState<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Bind `key` with the default codec and default options.
    pub fn new(key: &str, default: T) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        Self::with_codec(key, default, JsonCodec, Options::default())
    }

    /// Bind `key` with the default codec and explicit options.
    pub fn with_options(key: &str, default: T, options: Options) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        Self::with_codec(key, default, JsonCodec, options)
    }

    /// Bind `key` with an explicit codec.
    pub fn with_codec<C>(key: &str, default: T, codec: C, options: Options) -> Self
    where
        C: Codec<T> + 'static,
    {
        let runtime = UrlRuntime::current();
        let default = Arc::new(default);
        let codec: Arc<dyn Codec<T>> = Arc::new(codec);

        let initial = match runtime.current_value(key) {
            Some(raw) => codec
                .decode(&raw)
                .unwrap_or_else(|_| (*default).clone()),
            None => (*default).clone(),
        };
        let value = Arc::new(RwLock::new(initial));

        let subscription = {
            let value = Arc::clone(&value);
            let codec = Arc::clone(&codec);
            let default = Arc::clone(&default);
            runtime.subscribe(key, move |raw| {
                let next = raw
                    .as_deref()
                    .and_then(|raw| codec.decode(raw).ok())
                    .unwrap_or_else(|| (*default).clone());
                *value.write().unwrap() = next;
            })
        };

        Self {
            key: key.to_string(),
            default,
            codec,
            options,
            value,
            runtime,
            _subscription: Arc::new(subscription),
        }
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The locally cached value.
    pub fn get(&self) -> T {
        self.value.read().unwrap().clone()
    }

    /// Read the cached value with a function, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.value.read().unwrap();
        f(&value)
    }

    /// Write a literal value.
    pub fn set(&self, value: T) {
        self.write(value);
    }

    /// Write through a function of the previous value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.get();
        self.write(f(&current));
    }

    fn write(&self, value: T) {
        let encoded = self.codec.encode(&value);
        let (value, encoded) = if encoded.is_none() && !self.options.allow_nullish {
            let default = (*self.default).clone();
            let encoded = self.codec.encode(&default);
            (default, encoded)
        } else {
            (value, encoded)
        };

        *self.value.write().unwrap() = value;

        let default_encoded = self.codec.encode(&self.default);
        let param = match encoded {
            Some(s) if !s.is_empty() && Some(&s) != default_encoded.as_ref() => Some(s),
            _ => None,
        };
        let mode = if self.options.replace {
            UpdateMode::Replace
        } else {
            UpdateMode::Push
        };
        self.runtime
            .update_url(&self.key, param.as_deref(), mode);
    }
}

/// Bind a key on the current runtime.
///
/// # Example
///
/// ```ignore
/// let blind = create_url_state("blind", false);
/// let base = create_url_state("base", 10);
///
/// base.set(16);
/// assert_eq!(base.get(), 16);
/// ```
pub fn create_url_state<T>(key: &str, default: T) -> UrlState<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    UrlState::new(key, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryHistory;

    #[test]
    fn initializes_from_url() {
        let history = MemoryHistory::with_search("xP=6");
        let runtime = UrlRuntime::new(history);
        UrlRuntime::with_runtime(runtime, || {
            let x_positive = UrlState::new("xP", 5);
            assert_eq!(x_positive.get(), 6);
        });
    }

    #[test]
    fn initializes_to_default_when_absent() {
        UrlRuntime::scope(|| {
            let x_positive = UrlState::new("xP", 5);
            assert_eq!(x_positive.get(), 5);
        });
    }

    #[test]
    fn malformed_value_degrades_to_default() {
        let history = MemoryHistory::with_search("xP=garbage");
        let runtime = UrlRuntime::new(history);
        UrlRuntime::with_runtime(runtime, || {
            let x_positive = UrlState::new("xP", 5);
            assert_eq!(x_positive.get(), 5);
        });
    }

    #[test]
    fn plain_string_bypasses_structured_decoding() {
        let history = MemoryHistory::with_search("label=not%20json");
        let runtime = UrlRuntime::new(history);
        UrlRuntime::with_runtime(runtime, || {
            let label = UrlState::new("label", String::new());
            assert_eq!(label.get(), "not json");
        });
    }

    #[test]
    fn write_updates_url_and_cache() {
        let history = MemoryHistory::new();
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let x_positive = UrlState::new("xP", 5);
            x_positive.set(7);
            assert_eq!(x_positive.get(), 7);
            assert_eq!(history.search(), "xP=7");
            assert_eq!(history.len(), 2);
        });
    }

    #[test]
    fn replace_mode_rewrites_in_place() {
        let history = MemoryHistory::new();
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let printable = UrlState::with_options(
                "printable",
                false,
                Options {
                    replace: true,
                    ..Options::default()
                },
            );
            printable.set(true);
            assert_eq!(history.search(), "printable=true");
            assert_eq!(history.len(), 1);
        });
    }

    #[test]
    fn writing_default_removes_key() {
        let history = MemoryHistory::with_search("xP=6&base=10");
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let x_positive = UrlState::new("xP", 5);
            let base = UrlState::new("base", 10);

            // A re-write of the default must not duplicate the key
            base.set(10);
            assert_eq!(history.search(), "xP=6");

            x_positive.set(5);
            assert_eq!(history.search(), "");
        });
    }

    #[test]
    fn update_applies_previous_value() {
        UrlRuntime::scope(|| {
            let x_positive = UrlState::new("xP", 5);
            x_positive.update(|n| n + 1);
            assert_eq!(x_positive.get(), 6);
            x_positive.update(|n| n * 2);
            assert_eq!(x_positive.get(), 12);
        });
    }

    #[test]
    fn nan_write_substitutes_default() {
        let history = MemoryHistory::new();
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let factor = UrlState::new("xAxisFactor", 2.0);
            factor.set(f64::NAN);
            assert_eq!(factor.get(), 2.0);
            assert_eq!(history.search(), "");
        });
    }

    #[test]
    fn nullish_write_clears_key_when_allowed() {
        let history = MemoryHistory::with_search("visible=0.0");
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let visible: UrlState<Option<i32>> = UrlState::with_options(
                "visible",
                None,
                Options {
                    allow_nullish: true,
                    ..Options::default()
                },
            );
            visible.set(None);
            assert_eq!(history.search(), "");
            assert_eq!(visible.get(), None);
        });
    }

    #[test]
    fn siblings_converge_within_one_write() {
        UrlRuntime::scope(|| {
            let a = UrlState::new("xP", 5);
            let b = UrlState::new("xP", 5);
            a.set(8);
            assert_eq!(a.get(), 8);
            assert_eq!(b.get(), 8);
        });
    }

    #[test]
    fn clones_share_state_and_subscription() {
        let history = MemoryHistory::new();
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let a = UrlState::new("xP", 5);
            let b = a.clone();
            a.set(9);
            assert_eq!(b.get(), 9);

            drop(a);
            assert!(history.is_monitored());
            drop(b);
            assert!(!history.is_monitored());
        });
    }

    #[test]
    fn navigation_updates_cache_without_writes() {
        let history = MemoryHistory::with_search("xP=6");
        let runtime = UrlRuntime::new(history.clone());
        UrlRuntime::with_runtime(runtime, || {
            let x_positive = UrlState::new("xP", 5);
            x_positive.set(4);
            history.back();
            assert_eq!(x_positive.get(), 6);
            history.forward();
            assert_eq!(x_positive.get(), 4);
        });
    }
}
