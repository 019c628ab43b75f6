//! Compute-once storage for parsed source maps.
//!
//! Hosts typically hand the same source map text to every backtrace request. Decoding the
//! `mappings` string is by far the most expensive step, so [`SourceMapCache`] keeps each
//! parsed [`SourceMap`] keyed by a SHA-1 digest of the document text together with the
//! validation flags it was decoded under.
//!
//! # Thread Safety
//!
//! The cache is `Send + Sync` and can be shared across worker threads. The per-key entry
//! lock is held while a document is decoded, so concurrent requests for the same document
//! decode it exactly once and then share the resulting [`Arc`]. Documents that fail to
//! decode are not cached; every request for them reports the error again.
//!
//! # Capacity
//!
//! The cache holds a bounded number of maps. Once full, inserting a new document evicts
//! the one inserted longest ago, so a host that swaps bundles keeps only the recent ones
//! alive. Maps already handed out stay valid through their [`Arc`].

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use dashmap::{mapref::entry::Entry, DashMap};
use sha1::{Digest, Sha1};

use crate::{sourcemap::SourceMap, ResolverConfig, Result, DEFAULT_SOURCE_MAP_CACHE_CAPACITY};

type CacheKey = [u8; 20];

/// Concurrent, bounded cache of parsed source maps.
#[derive(Debug)]
pub struct SourceMapCache {
    entries: DashMap<CacheKey, Arc<SourceMap>>,
    /// Keys in insertion order, oldest first
    order: Mutex<VecDeque<CacheKey>>,
    capacity: usize,
}

impl Default for SourceMapCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SOURCE_MAP_CACHE_CAPACITY)
    }
}

impl SourceMapCache {
    /// Create an empty cache holding up to [`DEFAULT_SOURCE_MAP_CACHE_CAPACITY`] maps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache holding up to `capacity` maps (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SourceMapCache {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of maps kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the parsed form of `text`, decoding it on first use.
    ///
    /// # Errors
    /// Returns the errors of [`SourceMap::parse`]; failures are not cached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use jsbacktrace::{ResolverConfig, SourceMapCache};
    ///
    /// let cache = SourceMapCache::new();
    /// let text = r#"{"sources":["a.js"],"mappings":"AAAA"}"#;
    /// let first = cache.get_or_parse(text, &ResolverConfig::default())?;
    /// let second = cache.get_or_parse(text, &ResolverConfig::default())?;
    /// assert!(Arc::ptr_eq(&first, &second));
    /// # Ok::<(), jsbacktrace::Error>(())
    /// ```
    pub fn get_or_parse(&self, text: &str, config: &ResolverConfig) -> Result<Arc<SourceMap>> {
        let key = cache_key(text, config);

        let map = match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                log::debug!("Source map cache hit ({} bytes)", text.len());
                return Ok(Arc::clone(entry.get()));
            }
            Entry::Vacant(entry) => {
                log::debug!("Source map cache miss, decoding {} bytes", text.len());
                let map = Arc::new(SourceMap::parse(text, config)?);
                entry.insert(Arc::clone(&map));
                map
            }
        };

        // The entry guard is released here; evicting under it could lock the same shard.
        self.evict_after_insert(key);
        Ok(map)
    }

    fn evict_after_insert(&self, key: CacheKey) {
        let evicted: Vec<CacheKey> = {
            let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
            order.push_back(key);
            let excess = order.len().saturating_sub(self.capacity);
            order.drain(..excess).collect()
        };

        for key in evicted {
            if self.entries.remove(&key).is_some() {
                log::debug!("Source map cache full, evicted oldest entry");
            }
        }
    }

    /// Number of cached maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached map.
    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.clear();
        self.entries.clear();
    }
}

fn cache_key(text: &str, config: &ResolverConfig) -> CacheKey {
    let mut hasher = Sha1::new();
    hasher.update([
        u8::from(config.validate_segment_order),
        u8::from(config.validate_indices),
        u8::from(config.validate_positions),
    ]);
    hasher.update(text.as_bytes());
    let result = hasher.finalize();

    let mut key = [0u8; 20];
    key.copy_from_slice(&result);
    key
}
