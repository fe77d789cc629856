// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Zkredit Labs

//! Record fetching, caching, and selection.
//!
//! Every `request_records` call may raise a user-facing wallet prompt, so
//! results are memoized for a short window keyed by (address, program).
//! Selection of the record to use is a pure function over the fetched list.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::RECORD_CACHE_WINDOW;

use super::boundary::WalletBoundary;
use super::types::EncryptedRecord;

/// At most one profile and one loan list per connected wallet are live at a
/// time; a handful of entries covers reconnects under other addresses.
const CACHE_CAPACITY: usize = 8;

/// Time source for cache expiry. Injected so tests control the clock
/// instead of sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    address: String,
    program_id: String,
}

struct CacheEntry {
    /// `None` is a cached "adapter returned nothing" result; caching it too
    /// keeps a profile-less wallet from being re-prompted every render.
    records: Option<Vec<EncryptedRecord>>,
    fetched_at: Instant,
}

/// Time-boxed memoization of the adapter's record lists.
pub struct RecordCache {
    entries: LruCache<CacheKey, CacheEntry>,
    window: Duration,
    clock: Box<dyn Clock>,
}

impl RecordCache {
    /// Cache with the protocol default window and the system clock.
    pub fn new() -> Self {
        Self::with_clock(RECORD_CACHE_WINDOW, Box::new(SystemClock))
    }

    /// Cache with an explicit window and clock, for tests.
    pub fn with_clock(window: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap()),
            window,
            clock,
        }
    }

    /// Look up a fresh entry. Outer `None` means miss or expired; the inner
    /// value is whatever the adapter last returned, including its null.
    pub fn get(&mut self, address: &str, program_id: &str) -> Option<Option<Vec<EncryptedRecord>>> {
        let key = CacheKey {
            address: address.to_string(),
            program_id: program_id.to_string(),
        };
        let now = self.clock.now();
        let entry = self.entries.get(&key)?;
        if now.duration_since(entry.fetched_at) < self.window {
            Some(entry.records.clone())
        } else {
            None
        }
    }

    /// Store a fetch result, empty or not, stamped with the current time.
    pub fn put(&mut self, address: &str, program_id: &str, records: Option<Vec<EncryptedRecord>>) {
        let key = CacheKey {
            address: address.to_string(),
            program_id: program_id.to_string(),
        };
        self.entries.put(
            key,
            CacheEntry {
                records,
                fetched_at: self.clock.now(),
            },
        );
    }

    /// Drop everything. Called after any state-mutating transaction so the
    /// next read observes fresh records.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch records for a program through the cache.
///
/// On a miss the boundary is invoked exactly once and the result is stored
/// even when empty. A boundary rejection leaves the cache unset, is logged
/// with its kind, and yields `None` — callers treat that as "no records",
/// not as a hard failure. The lock is held across the fetch so concurrent
/// misses for the same program collapse into one prompt.
pub async fn cached_records(
    boundary: &dyn WalletBoundary,
    cache: &Mutex<RecordCache>,
    address: &str,
    program_id: &str,
) -> Option<Vec<EncryptedRecord>> {
    let mut guard = cache.lock().await;

    if let Some(hit) = guard.get(address, program_id) {
        debug!(program_id, "using cached records");
        return hit;
    }

    match boundary.request_records(program_id).await {
        Ok(records) => {
            let stored = records.filter(|r| !r.is_empty());
            guard.put(address, program_id, stored.clone());
            stored
        }
        Err(err) => {
            warn!(program_id, error = %err, "record fetch failed; treating as no records");
            None
        }
    }
}

/// Outcome of the record selection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChoice {
    pub record: EncryptedRecord,
    /// True when no unspent record existed and the last element was used as
    /// the best guess. Callers warn the user instead of failing.
    pub spent_fallback: bool,
}

/// Select the record to present or spend from a fetched list.
///
/// Unspent records (spent false or absent) win regardless of position; with
/// none available, the last element is taken as "most recent". Total over
/// any input: empty lists yield `None`, never a panic.
///
/// The absent-flag-is-unspent rule mirrors adapter behavior that may itself
/// be masking stale state; see DESIGN.md. The ranking would switch to an
/// explicit height comparison if the adapter ever exposed block heights.
pub fn choose_record(records: &[EncryptedRecord]) -> Option<RecordChoice> {
    if let Some(unspent) = records.iter().find(|r| r.is_unspent()) {
        return Some(RecordChoice {
            record: unspent.clone(),
            spent_fallback: false,
        });
    }

    records.last().map(|record| {
        warn!(record_id = %record.id, "no unspent record available; falling back to newest");
        RecordChoice {
            record: record.clone(),
            spent_fallback: true,
        }
    })
}

/// Active loans are the unspent records held under the loan program.
pub fn active_loans(records: &[EncryptedRecord]) -> Vec<EncryptedRecord> {
    records.iter().filter(|r| r.is_unspent()).cloned().collect()
}
