use lru::LruCache;
use std::num::NonZeroUsize;

/// Composite key of one minimax call.
///
/// The search window is part of the key: a stored value is reused only for
/// the identical `(alpha, beta)` pair and is never treated as a bound under a
/// different window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    position: String,
    depth: u32,
    alpha: u64,
    beta: u64,
    maximizing: bool,
}

impl WindowKey {
    pub fn new(position: String, depth: u32, alpha: f64, beta: f64, maximizing: bool) -> Self {
        Self {
            position,
            depth,
            alpha: window_bits(alpha),
            beta: window_bits(beta),
            maximizing,
        }
    }
}

/// Bit pattern of a window bound with -0.0 folded into 0.0
fn window_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub size: usize,
    /// `None` when the cache grows without bound
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Window-keyed minimax memo.
///
/// Without a capacity the cache is never evicted and grows for the lifetime
/// of its owner. With a capacity it evicts the least recently used entry.
pub struct TranspositionCache {
    entries: LruCache<WindowKey, f64>,
    bounded: bool,
    hits: u64,
    misses: u64,
}

impl TranspositionCache {
    /// Cache that never evicts
    pub fn unbounded() -> Self {
        Self {
            entries: LruCache::unbounded(),
            bounded: false,
            hits: 0,
            misses: 0,
        }
    }

    /// LRU cache holding at most `capacity` entries
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            bounded: true,
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => Self::with_capacity(capacity),
            None => Self::unbounded(),
        }
    }

    pub fn get(&mut self, key: &WindowKey) -> Option<f64> {
        match self.entries.get(key) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: WindowKey, value: f64) {
        self.entries.put(key, value);
    }

    pub fn contains(&self, key: &WindowKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.bounded.then(|| self.entries.cap().get()),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
