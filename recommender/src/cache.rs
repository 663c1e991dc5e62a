// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Memoization of the base recommendations per fingerprint.

use std::{
    collections::HashMap,
    num::NonZeroUsize,
    sync::Arc,
    time::{Duration, Instant},
};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::{
    fingerprint::Fingerprint,
    pipeline::ScoredCourse,
    utils::serde_option_duration_as_seconds,
};

/// A shared base recommendation list.
pub type Recommendations = Arc<[ScoredCourse]>;

/// Configurations of the recommendation cache.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// The maximum number of cached fingerprints, `0` means unbounded.
    pub capacity: usize,
    /// The time after which an entry of a bounded cache expires.
    #[serde(with = "serde_option_duration_as_seconds")]
    pub time_to_live: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            time_to_live: None,
        }
    }
}

impl Config {
    /// Creates the storage described by this configuration.
    pub fn build_storage(&self) -> Storage {
        match NonZeroUsize::new(self.capacity) {
            Some(capacity) => Storage::Lru(LruStorage::new(capacity, self.time_to_live)),
            None => Storage::Unbounded(UnboundedStorage::default()),
        }
    }
}

/// A storage of base recommendations.
pub trait CacheStorage {
    fn get(&mut self, fingerprint: &Fingerprint) -> Option<Recommendations>;

    /// Inserts the recommendations, an existing entry is kept as it is.
    fn insert(&mut self, fingerprint: Fingerprint, recommendations: Recommendations);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A storage which never forgets.
#[derive(Debug, Default)]
pub struct UnboundedStorage(HashMap<Fingerprint, Recommendations>);

impl CacheStorage for UnboundedStorage {
    fn get(&mut self, fingerprint: &Fingerprint) -> Option<Recommendations> {
        self.0.get(fingerprint).cloned()
    }

    fn insert(&mut self, fingerprint: Fingerprint, recommendations: Recommendations) {
        self.0.entry(fingerprint).or_insert(recommendations);
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// A bounded storage evicting the least recently used entry.
///
/// Entries older than the time to live are treated as missing and dropped on access.
pub struct LruStorage {
    entries: LruCache<Fingerprint, (Instant, Recommendations)>,
    time_to_live: Option<Duration>,
}

impl LruStorage {
    pub fn new(capacity: NonZeroUsize, time_to_live: Option<Duration>) -> Self {
        Self {
            entries: LruCache::new(capacity),
            time_to_live,
        }
    }

    fn get_at(&mut self, fingerprint: &Fingerprint, now: Instant) -> Option<Recommendations> {
        let (inserted, recommendations) = self
            .entries
            .get(fingerprint)
            .map(|(inserted, recommendations)| (*inserted, recommendations.clone()))?;
        if self
            .time_to_live
            .map_or(false, |ttl| now.saturating_duration_since(inserted) >= ttl)
        {
            self.entries.pop(fingerprint);
            return None;
        }

        Some(recommendations)
    }

    fn insert_at(&mut self, fingerprint: Fingerprint, recommendations: Recommendations, now: Instant) {
        if self.get_at(&fingerprint, now).is_none() {
            self.entries.put(fingerprint, (now, recommendations));
        }
    }
}

impl CacheStorage for LruStorage {
    fn get(&mut self, fingerprint: &Fingerprint) -> Option<Recommendations> {
        self.get_at(fingerprint, Instant::now())
    }

    fn insert(&mut self, fingerprint: Fingerprint, recommendations: Recommendations) {
        self.insert_at(fingerprint, recommendations, Instant::now());
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The storage selected by the [`Config`].
pub enum Storage {
    Unbounded(UnboundedStorage),
    Lru(LruStorage),
}

impl CacheStorage for Storage {
    fn get(&mut self, fingerprint: &Fingerprint) -> Option<Recommendations> {
        match self {
            Self::Unbounded(storage) => storage.get(fingerprint),
            Self::Lru(storage) => storage.get(fingerprint),
        }
    }

    fn insert(&mut self, fingerprint: Fingerprint, recommendations: Recommendations) {
        match self {
            Self::Unbounded(storage) => storage.insert(fingerprint, recommendations),
            Self::Lru(storage) => storage.insert(fingerprint, recommendations),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Unbounded(storage) => storage.len(),
            Self::Lru(storage) => storage.len(),
        }
    }
}

type InFlight = Arc<OnceCell<Recommendations>>;

/// A single-flight cache of base recommendations.
///
/// Concurrent misses for the same fingerprint share one computation, the others wait for its
/// result. Failed computations are not cached.
pub struct RecommendationCache<S = Storage> {
    storage: Mutex<S>,
    in_flight: Mutex<HashMap<Fingerprint, InFlight>>,
}

impl<S> RecommendationCache<S>
where
    S: CacheStorage,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage: Mutex::new(storage),
            in_flight: Mutex::default(),
        }
    }

    /// The number of cached fingerprints.
    pub async fn len(&self) -> usize {
        self.storage.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.lock().await.is_empty()
    }

    /// Gets the cached recommendations or computes and caches them.
    pub async fn get_or_compute<F, E>(
        &self,
        fingerprint: &Fingerprint,
        compute: F,
    ) -> Result<Recommendations, E>
    where
        F: FnOnce() -> Result<Vec<ScoredCourse>, E>,
    {
        let cached = self.storage.lock().await.get(fingerprint);
        if let Some(recommendations) = cached {
            debug!(%fingerprint, "recommendation cache hit");
            return Ok(recommendations);
        }

        let cell = {
            let mut in_flight = self.in_flight.lock().await;
            // an entry might have been completed after the first lookup
            let cached = self.storage.lock().await.get(fingerprint);
            if let Some(recommendations) = cached {
                return Ok(recommendations);
            }
            in_flight.entry(fingerprint.clone()).or_default().clone()
        };

        let result = cell
            .get_or_try_init(|| async {
                debug!(%fingerprint, "recommendation cache miss");
                compute().map(Recommendations::from)
            })
            .await
            .cloned();

        if let Ok(recommendations) = &result {
            self.storage
                .lock()
                .await
                .insert(fingerprint.clone(), recommendations.clone());
        }
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(fingerprint)
            .map_or(false, |current| Arc::ptr_eq(current, &cell))
        {
            in_flight.remove(fingerprint);
        }

        result
    }
}
