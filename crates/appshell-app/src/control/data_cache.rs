//! Payloads handed from `openwithdata` to the page it opens.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Single-read payload store: `take` removes what it returns.
#[derive(Default)]
pub struct DataCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload, replacing any earlier one under the same id.
    pub fn put(&self, id: impl Into<String>, data: Value) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), data);
    }

    pub fn take(&self, id: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_delivered_once() {
        let cache = DataCache::new();
        cache.put("abc", json!({"rows": [1, 2, 3]}));

        assert_eq!(cache.take("abc"), Some(json!({"rows": [1, 2, 3]})));
        assert_eq!(cache.take("abc"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(DataCache::new().take("missing"), None);
    }

    #[test]
    fn put_overwrites() {
        let cache = DataCache::new();
        cache.put("k", json!(1));
        cache.put("k", json!(2));
        assert_eq!(cache.take("k"), Some(json!(2)));
    }
}
