//! Loaded module cache
//!
//! Maps resource paths to the module handle materialized for them. An
//! entry is written once and never evicted, so a path is fetched and
//! evaluated at most once per loader.

use std::collections::HashMap;

use crate::module::ModuleHandle;

/// Cached module entry
#[derive(Debug, Clone)]
pub struct CachedModule {
    /// Resource path the module was requested under
    pub path: String,
    /// URL the source was fetched from
    pub url: String,
    /// SHA-256 checksum of the fetched source (hex-encoded)
    pub checksum: String,
    /// Materialized module
    pub handle: ModuleHandle,
}

/// Module cache keyed by resource path
#[derive(Debug, Default)]
pub struct ModuleCache {
    modules: HashMap<String, CachedModule>,
    hits: usize,
    misses: usize,
}

impl ModuleCache {
    /// Create a new empty module cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a module handle, counting the hit or miss
    pub fn get(&mut self, path: &str) -> Option<ModuleHandle> {
        match self.modules.get(path) {
            Some(cached) => {
                self.hits += 1;
                Some(cached.handle.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Get the full cache entry without touching statistics
    pub fn entry(&self, path: &str) -> Option<&CachedModule> {
        self.modules.get(path)
    }

    /// Record a loaded module
    ///
    /// An existing entry for the path is kept; the first load wins.
    pub fn insert(&mut self, cached: CachedModule) -> ModuleHandle {
        self.modules
            .entry(cached.path.clone())
            .or_insert(cached)
            .handle
            .clone()
    }

    /// Check if a path is in the cache
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }

    /// Get the number of cached modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Get all cached paths
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.modules.keys()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.modules.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entries
    pub entries: usize,
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl CacheStats {
    /// Get cache hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleDef;

    fn cached(path: &str, name: &str) -> CachedModule {
        CachedModule {
            path: path.to_string(),
            url: format!("lib/{}", path),
            checksum: String::new(),
            handle: ModuleHandle::new(ModuleDef::new(name)),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = ModuleCache::new();
        let handle = cache.insert(cached("Foo/Bar.js", "Foo.Bar"));

        assert_eq!(cache.get("Foo/Bar.js"), Some(handle));
        assert_eq!(cache.entry("Foo/Bar.js").unwrap().url, "lib/Foo/Bar.js");
    }

    #[test]
    fn test_first_insert_wins() {
        let mut cache = ModuleCache::new();
        let first = cache.insert(cached("A.js", "A"));
        let second = cache.insert(cached("A.js", "A"));

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = ModuleCache::new();
        cache.insert(cached("A.js", "A"));

        let _ = cache.get("Missing.js");
        let _ = cache.get("A.js");
        let _ = cache.get("A.js");

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_ratio() - 0.666).abs() < 0.01);
    }
}
