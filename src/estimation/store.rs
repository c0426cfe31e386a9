use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::storage::StorageBackend;

const STORAGE_KEY: &str = "estimations";

type Subscriber = Box<dyn Fn(&Estimations) + Send + Sync>;

/// Recorded estimations, keyed by row exponent then column exponent.
///
/// Serializes as nested JSON objects with stringified integer keys,
/// e.g. `{"0":{"1":2.5}}`. A `null` leaf is a cleared estimate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Estimations(pub BTreeMap<i32, BTreeMap<i32, Option<f64>>>);

impl Estimations {
    pub fn get(&self, row: i32, column: i32) -> Option<f64> {
        self.0.get(&row).and_then(|columns| *columns.get(&column)?)
    }

    pub fn set(&mut self, row: i32, column: i32, estimate: Option<f64>) {
        self.0.entry(row).or_default().insert(column, estimate);
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|columns| columns.is_empty())
    }

    /// Every recorded estimate as `(row, column, estimate)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, f64)> + '_ {
        self.0.iter().flat_map(|(&row, columns)| {
            columns
                .iter()
                .filter_map(move |(&column, &estimate)| Some((row, column, estimate?)))
        })
    }
}

/// Estimations with change notification and durable persistence.
///
/// The store loads once from its backend under the `estimations` key at
/// construction, falls back to the provided seed when the payload is
/// missing or malformed, notifies subscribers on every change, and
/// rewrites the backend after every change. Persistence failures are
/// swallowed; the store keeps working session-only.
pub struct EstimationStore {
    state: Arc<RwLock<Estimations>>,
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    storage: Arc<dyn StorageBackend>,
    seed: Estimations,
}

impl EstimationStore {
    /// Load from `storage`, falling back to `seed`.
    pub fn load(storage: Arc<dyn StorageBackend>, seed: Estimations) -> Self {
        let initial = storage
            .get_item(STORAGE_KEY)
            .and_then(|payload| serde_json::from_str(&payload).ok())
            .unwrap_or_else(|| seed.clone());
        Self {
            state: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            storage,
            seed,
        }
    }

    /// A clone of the current estimations.
    pub fn get(&self) -> Estimations {
        self.state.read().unwrap().clone()
    }

    /// Record (or clear, with `None`) one cell's estimate.
    pub fn set_estimate(&self, row: i32, column: i32, estimate: Option<f64>) {
        self.update(|estimations| estimations.set(row, column, estimate));
    }

    /// Drop every recorded estimate.
    pub fn clear(&self) {
        self.update(|estimations| *estimations = Estimations::default());
    }

    /// Restore the seed data supplied at load time.
    pub fn reset(&self) {
        let seed = self.seed.clone();
        self.update(|estimations| *estimations = seed);
    }

    /// Mutate the estimations, then persist and notify.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Estimations),
    {
        {
            let mut state = self.state.write().unwrap();
            f(&mut state);
        }
        self.persist();
        self.notify();
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Estimations) + Send + Sync + 'static,
    {
        self.subscribers.write().unwrap().push(Box::new(callback));
    }

    fn persist(&self) {
        let state = self.state.read().unwrap();
        match serde_json::to_string(&*state) {
            Ok(payload) => self.storage.set_item(STORAGE_KEY, &payload),
            Err(error) => tracing::warn!(%error, "dropping estimations persist"),
        }
    }

    fn notify(&self) {
        let state = self.state.read().unwrap();
        let subscribers = self.subscribers.read().unwrap();
        for subscriber in subscribers.iter() {
            subscriber(&state);
        }
    }
}

impl Clone for EstimationStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
            storage: Arc::clone(&self.storage),
            seed: self.seed.clone(),
        }
    }
}
