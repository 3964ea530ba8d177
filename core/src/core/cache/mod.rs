//! Short-lived memoization of aggregate results.
//!
//! Entries expire after a fixed TTL and the whole map is dropped on every
//! write, so callers see at most one TTL of staleness from other writers.
//! Every `invalidate_all` bumps a generation; a result computed under an older
//! generation is not stored. The cache is per-process.

use crate::types::{AggregateResult, DeviceToken, Word};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Distinguishing parameters of a stats query.
///
/// The device token is part of the key so that personalized results are
/// never served to another caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub focus: Option<Word>,
    pub device: Option<DeviceToken>,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let focus = self.focus.as_ref().map_or("-", |w| w.as_str());
        let device = self.device.as_ref().map_or("-", |d| d.as_str());
        write!(f, "stats:{focus}:{device}")
    }
}

#[derive(Debug)]
struct Entry {
    result: AggregateResult,
    expires_at: SystemTime,
}

#[derive(Debug, Default)]
struct Entries {
    generation: u64,
    map: HashMap<CacheKey, Entry>,
}

#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<Entries>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_max_entries(ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(Entries::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // Entries are plain data; a panic elsewhere cannot leave them half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached result if its expiry is still in the future.
    pub fn get(&self, key: &CacheKey, now: SystemTime) -> Option<AggregateResult> {
        let entries = self.lock();
        let entry = entries.map.get(key)?;
        (entry.expires_at > now).then(|| entry.result.clone())
    }

    /// Current generation. Read it before computing a result that will be
    /// passed to `set_if_current`.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn set(&self, key: CacheKey, result: AggregateResult, now: SystemTime) {
        let mut entries = self.lock();
        self.insert(&mut entries, key, result, now);
    }

    /// Stores the result only if no invalidation happened since `generation`
    /// was read. Returns whether it was stored.
    pub fn set_if_current(
        &self,
        key: CacheKey,
        result: AggregateResult,
        now: SystemTime,
        generation: u64,
    ) -> bool {
        let mut entries = self.lock();
        if entries.generation != generation {
            return false;
        }
        self.insert(&mut entries, key, result, now);
        true
    }

    fn insert(&self, entries: &mut Entries, key: CacheKey, result: AggregateResult, now: SystemTime) {
        entries.map.insert(
            key,
            Entry {
                result,
                expires_at: now + self.ttl,
            },
        );

        if entries.map.len() > self.max_entries {
            entries.map.retain(|_, entry| entry.expires_at > now);
        }
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.lock();
        entries.generation = entries.generation.wrapping_add(1);
        entries.map.clear();
    }

    /// Drops expired entries. Returns how many were removed.
    pub fn sweep(&self, now: SystemTime) -> usize {
        let mut entries = self.lock();
        let before = entries.map.len();
        entries.map.retain(|_, entry| entry.expires_at > now);
        before - entries.map.len()
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
