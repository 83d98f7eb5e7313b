//! Time-bounded memoization of expensive read operations
//!
//! Entries are keyed by operation name plus a hash of the call arguments and
//! live for a fixed TTL. Expired entries are only replaced when the same key
//! is requested again; nothing is ever swept.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::time::{Clock, SystemClock};

/// Default entry lifetime: one hour
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

/// Identity of one memoized call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    arguments: u64,
}

impl CacheKey {
    /// Key for `operation` called with `arguments`.
    ///
    /// Identical arguments always produce the same key within a process.
    pub fn new<A: Hash + ?Sized>(operation: &'static str, arguments: &A) -> Self {
        let mut hasher = DefaultHasher::new();
        arguments.hash(&mut hasher);
        Self {
            operation,
            arguments: hasher.finish(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:016x}", self.operation, self.arguments)
    }
}

struct CacheEntry<V> {
    expires_at: DateTime<Utc>,
    value: V,
}

/// TTL cache shared by concurrent readers.
///
/// Values are cloned out on every hit, so `V` is usually an `Arc`.
pub struct MemoCache<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> MemoCache<V> {
    /// Cache using the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value for `key`, or run `compute` and store its
    /// result when the entry is missing or expired.
    ///
    /// Errors from `compute` are returned as-is and not cached. Concurrent
    /// callers that miss at the same time may both compute; each stored
    /// entry is written whole, value and expiry together.
    pub fn get_or_try_insert_with<E, F>(&self, key: CacheKey, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let now = self.clock.now();

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(&key) {
                if now < entry.expires_at {
                    debug!("Retrieving from cache {}", key);
                    return Ok(entry.value.clone());
                }
            }
        }

        debug!("Refreshing cache for {}", key);
        let value = compute()?;
        // Past the representable range the entry simply never expires
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            expires_at,
            value: value.clone(),
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);

        Ok(value)
    }
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}
