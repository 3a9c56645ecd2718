//! Small per-parse cache of interned object keys.
//!
//! Documents tend to repeat the same member names (`"id"`, `"name"`, ...) in
//! every element of an array. The cache maps the key text to the host key
//! built the first time it was seen, so later occurrences share one object.
//!
//! Entries borrow their text from the read tree, which lives for the whole
//! build, and are kept sorted by `(hash, len, bytes)` for binary search. The
//! cache never evicts: once [`CAPACITY`] entries exist, new keys are interned
//! without being cached.

use core::cmp::Ordering;

/// Maximum number of cached keys.
pub const CAPACITY: usize = 63;
/// Longest key, in bytes, that is considered for caching.
pub const MAX_KEY_LEN: usize = 55;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET, |h, &b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME))
}

/// Keys that are empty, too long, or do not start with an ASCII letter are
/// never cached.
#[must_use]
pub fn is_cacheable(key: &str) -> bool {
    key.len() <= MAX_KEY_LEN && key.as_bytes().first().is_some_and(u8::is_ascii_alphabetic)
}

/// Counters describing how a cache was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that interned a new key and cached it.
    pub inserts: usize,
    /// Keys interned without consulting the cache.
    pub bypasses: usize,
    /// Cacheable keys that missed while the cache was full.
    pub overflows: usize,
}

impl CacheStats {
    /// Total number of keys that went through the cache.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.hits + self.inserts + self.bypasses + self.overflows
    }
}

struct CacheEntry<'t, K> {
    hash: u32,
    key: &'t str,
    value: K,
}

impl<K> CacheEntry<'_, K> {
    fn cmp_to(&self, hash: u32, key: &str) -> Ordering {
        self.hash
            .cmp(&hash)
            .then_with(|| self.key.len().cmp(&key.len()))
            .then_with(|| self.key.as_bytes().cmp(key.as_bytes()))
    }
}

/// Sorted, bounded lookup from key text to an interned host key.
pub struct KeyCache<'t, K> {
    entries: Vec<CacheEntry<'t, K>>,
    stats: CacheStats,
}

impl<'t, K: Clone> KeyCache<'t, K> {
    /// An empty cache. Storage is allocated on the first insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached key for `key`, or intern it with `intern`.
    ///
    /// A hit returns a clone of the stored value, so reference-typed keys keep
    /// their identity across lookups.
    pub fn lookup_or_intern(&mut self, key: &'t str, intern: impl FnOnce(&str) -> K) -> K {
        if !is_cacheable(key) {
            self.stats.bypasses += 1;
            log::trace!("jsonbind: key cache bypass for {} byte key", key.len());
            return intern(key);
        }

        let hash = fnv1a(key.as_bytes());
        match self.entries.binary_search_by(|e| e.cmp_to(hash, key)) {
            Ok(found) => {
                self.stats.hits += 1;
                self.entries[found].value.clone()
            }
            Err(slot) => {
                let value = intern(key);
                if self.entries.len() >= CAPACITY {
                    self.stats.overflows += 1;
                    log::trace!("jsonbind: key cache full, not caching {key:?}");
                } else {
                    self.stats.inserts += 1;
                    if self.entries.is_empty() {
                        self.entries.reserve_exact(CAPACITY);
                    }
                    self.entries.insert(
                        slot,
                        CacheEntry {
                            hash,
                            key,
                            value: value.clone(),
                        },
                    );
                }
                value
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K: Clone> Default for KeyCache<'_, K> {
    fn default() -> Self {
        Self::new()
    }
}
