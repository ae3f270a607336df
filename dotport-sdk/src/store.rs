//! Shared snapshot cache with TTL freshness and explicit invalidation.
//!
//! One store is created per client and injected everywhere dataset reads
//! happen. Tables and the dashboard share it, so a mutation in one place
//! invalidates the aggregates everywhere else.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Store key of the category rollup. Every successful table mutation
/// invalidates this alongside the table's own key, because the rollup
/// counts records across datasets.
pub const CATEGORY_SUMMARY_KEY: &str = "category-summaries";

/// Store key of the state reference directory.
pub const STATE_KEY: &str = "states";

/// An immutable fetched dataset: the records, the service-side total (when
/// reported), and when the fetch happened.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// The fetched rows, shared cheaply between holders
    pub records: Arc<Vec<T>>,
    /// Total matching rows server-side, when the service reported one
    pub total: Option<u64>,
    /// Fetch timestamp used for TTL checks
    pub fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    /// Wrap freshly fetched records, stamped now.
    pub fn new(records: Vec<T>, total: Option<u64>) -> Self {
        Self {
            records: Arc::new(records),
            total,
            fetched_at: Utc::now(),
        }
    }

    /// Number of records actually fetched (bounded by the cap, so this can
    /// be less than [`total`](Self::total)).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the fetch returned no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct StoreEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: DateTime<Utc>,
}

/// In-memory snapshot cache keyed by logical dataset name.
///
/// Values are type-erased so one store holds snapshots of every record
/// type; [`get`](Self::get) recovers the concrete type and returns `None`
/// on a type mismatch rather than panicking.
pub struct SnapshotStore {
    entries: DashMap<String, StoreEntry>,
    ttl: Duration,
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

impl SnapshotStore {
    /// Store with the given freshness window. `Duration::ZERO` keeps
    /// snapshots until they are explicitly invalidated.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The configured freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh snapshot for a key, if one is present and inside the TTL
    /// window. Expired entries are removed on the way out.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Snapshot<T>> {
        let entry = self.entries.get(key)?;
        if self.is_expired(entry.fetched_at) {
            drop(entry);
            self.entries.remove(key);
            return None;
        }

        // Rebuilt by hand so `T` needs no `Clone` bound; the rows are
        // behind an `Arc` either way.
        entry
            .value
            .clone()
            .downcast::<Snapshot<T>>()
            .ok()
            .map(|snapshot| Snapshot {
                records: Arc::clone(&snapshot.records),
                total: snapshot.total,
                fetched_at: snapshot.fetched_at,
            })
    }

    /// Cache a fetched snapshot under its dataset key, replacing whatever
    /// was there.
    pub fn insert<T: Send + Sync + 'static>(&self, key: impl Into<String>, snapshot: Snapshot<T>) {
        let entry = StoreEntry {
            fetched_at: snapshot.fetched_at,
            value: Arc::new(snapshot),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Discard one snapshot. The next read for this key goes to the
    /// service.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Discard everything.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached snapshots, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, fetched_at: DateTime<Utc>) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        Utc::now()
            .signed_duration_since(fetched_at)
            .to_std()
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }
}
