//! In-process memoization of reference-collection responses.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use serde_json::Value;

/// Endpoints whose result set is a single static list.
const SINGLE_ENTRY_ENDPOINTS: [&str; 2] = ["typeOfAuditoriums", "kindOfWorks"];

/// Parameterized reference endpoints, cached per query string.
const KEYED_ENDPOINTS: [&str; 10] = [
    "groups",
    "staffOfGroup",
    "streams",
    "staffOfStreams",
    "lecturers",
    "auditoriums",
    "buildings",
    "faculties",
    "chairs",
    "subGroups",
];

const KEYED_CAPACITY: usize = 16;

/// Per-endpoint LRU caches for reference collections.
///
/// Schedule responses are never cached. A poisoned lock degrades the
/// affected endpoint to pass-through rather than failing the request.
pub(crate) struct ResponseCache {
    caches: HashMap<&'static str, Mutex<LruCache<String, Value>>>,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("endpoints", &self.caches.len())
            .finish()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        let mut caches = HashMap::new();
        for endpoint in KEYED_ENDPOINTS {
            caches.insert(endpoint, Self::make_cache(KEYED_CAPACITY));
        }
        for endpoint in SINGLE_ENTRY_ENDPOINTS {
            caches.insert(endpoint, Self::make_cache(1));
        }
        Self { caches }
    }
}

impl ResponseCache {
    fn make_cache(capacity: usize) -> Mutex<LruCache<String, Value>> {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(capacity))
    }

    /// Cached response for the endpoint/key pair, marking it most recent.
    pub(crate) fn get(&self, endpoint: &str, key: &str) -> Option<Value> {
        let mut cache = self.caches.get(endpoint)?.lock().ok()?;
        cache.get(key).cloned()
    }

    /// Stores a response. Last write wins; uncached endpoints are ignored.
    pub(crate) fn put(&self, endpoint: &str, key: String, value: Value) {
        if let Some(cache) = self.caches.get(endpoint)
            && let Ok(mut cache) = cache.lock()
        {
            cache.put(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_returns_stored_value() {
        // Arrange
        let cache = ResponseCache::default();
        cache.put("groups", String::from("facultyOid=1"), json!([{"id": 1}]));

        // Act
        let hit = cache.get("groups", "facultyOid=1");
        let miss = cache.get("groups", "facultyOid=2");

        // Assert
        assert_eq!(hit, Some(json!([{"id": 1}])));
        assert_eq!(miss, None);
    }

    #[test]
    fn test_schedule_is_never_cached() {
        // Arrange
        let cache = ResponseCache::default();

        // Act
        cache.put("schedule", String::from("studentOid=1"), json!([]));

        // Assert
        assert_eq!(cache.get("schedule", "studentOid=1"), None);
    }

    #[test]
    fn test_last_write_wins() {
        // Arrange
        let cache = ResponseCache::default();
        cache.put("faculties", String::new(), json!([1]));

        // Act
        cache.put("faculties", String::new(), json!([2]));

        // Assert
        assert_eq!(cache.get("faculties", ""), Some(json!([2])));
    }

    #[test]
    fn test_single_entry_endpoints_hold_one_key() {
        // Arrange
        let cache = ResponseCache::default();
        cache.put("kindOfWorks", String::from("a"), json!([1]));

        // Act: a second key evicts the first
        cache.put("kindOfWorks", String::from("b"), json!([2]));

        // Assert
        assert_eq!(cache.get("kindOfWorks", "a"), None);
        assert_eq!(cache.get("kindOfWorks", "b"), Some(json!([2])));
    }

    #[test]
    fn test_keyed_endpoints_evict_least_recently_used() {
        // Arrange
        let cache = ResponseCache::default();
        for i in 0..KEYED_CAPACITY {
            cache.put("lecturers", format!("chairOid={i}"), json!([i]));
        }

        // Act: touch the oldest key, then insert one more
        assert!(cache.get("lecturers", "chairOid=0").is_some());
        cache.put("lecturers", String::from("chairOid=new"), json!(["new"]));

        // Assert: the refreshed key survives, the true LRU is gone
        assert!(cache.get("lecturers", "chairOid=0").is_some());
        assert_eq!(cache.get("lecturers", "chairOid=1"), None);
    }
}
