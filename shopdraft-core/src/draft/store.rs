//! The local product draft.
//!
//! The draft is an ordered list of products mirrored into a [`DraftCache`]
//! under a single key. Every mutation writes the full list back to the cache
//! before it becomes visible in memory, so a failed write leaves both sides
//! as they were.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use super::cache::{CacheError, DraftCache};
use crate::models::{Normalizer, Product, ProductFields};

/// Cache key the draft is stored under unless configured otherwise.
pub const DEFAULT_CACHE_KEY: &str = "dbProductsDraft";

/// Errors from draft mutations.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Failed to save draft: {0}")]
    Cache(#[from] CacheError),
    #[error("Failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Product not found in draft: {0}")]
    UnknownProduct(i64),
}

/// How a new product gets its id when the draft is empty.
///
/// A non-empty draft always allocates `max(id) + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Current Unix time in milliseconds.
    #[default]
    Timestamp,
    /// Start counting at 1.
    Sequential,
}

/// What `upsert` does with an id that is not in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownIdPolicy {
    /// Leave the draft untouched and report [`UpsertOutcome::Ignored`].
    #[default]
    Ignore,
    /// Fail with [`DraftError::UnknownProduct`].
    Reject,
}

/// Result of an `upsert` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
    Ignored(i64),
}

/// In-memory product list backed by a durable cache entry.
#[derive(Debug)]
pub struct DraftStore<C> {
    cache: C,
    key: String,
    products: Vec<Product>,
    normalizer: Normalizer,
    id_strategy: IdStrategy,
    unknown_id_policy: UnknownIdPolicy,
}

impl<C: DraftCache> DraftStore<C> {
    /// Creates an empty store. Call [`DraftStore::load`] to read the cache.
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            key: DEFAULT_CACHE_KEY.to_string(),
            products: Vec::new(),
            normalizer: Normalizer::default(),
            id_strategy: IdStrategy::default(),
            unknown_id_policy: UnknownIdPolicy::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_unknown_id_policy(mut self, policy: UnknownIdPolicy) -> Self {
        self.unknown_id_policy = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Replaces the in-memory list with the cached draft.
    ///
    /// Never fails: a missing entry, an unreadable cache or content that is
    /// not a JSON array all leave an empty draft.
    pub fn load(&mut self) -> &[Product] {
        self.products = match self.cache.read(&self.key) {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<Value>>(&contents) {
                Ok(values) => self.normalizer.normalize_values(values),
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "Malformed local cache, starting with an empty draft");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Could not read local cache, starting with an empty draft");
                Vec::new()
            }
        };

        tracing::debug!(count = self.products.len(), "Loaded draft");
        &self.products
    }

    /// Writes the current list to the cache, overwriting the previous entry.
    pub fn save(&mut self) -> Result<(), DraftError> {
        let contents = serde_json::to_string(&self.products)?;
        self.cache.write(&self.key, &contents)?;
        Ok(())
    }

    /// Creates a product (`id` is `None`) or merges `fields` into an existing one.
    pub fn upsert(
        &mut self,
        id: Option<i64>,
        fields: ProductFields,
    ) -> Result<UpsertOutcome, DraftError> {
        let mut next = self.products.clone();

        let outcome = match id {
            Some(id) => match next.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    product.apply(fields);
                    UpsertOutcome::Updated(id)
                }
                None => match self.unknown_id_policy {
                    UnknownIdPolicy::Reject => return Err(DraftError::UnknownProduct(id)),
                    UnknownIdPolicy::Ignore => {
                        tracing::warn!(id, "Ignoring update for a product that is not in the draft");
                        UpsertOutcome::Ignored(id)
                    }
                },
            },
            None => {
                let id = self.next_id();
                next.push(fields.into_product(id));
                UpsertOutcome::Created(id)
            }
        };

        self.commit(next)?;
        Ok(outcome)
    }

    /// Removes a product. Returns false if no product had that id.
    pub fn remove(&mut self, id: i64) -> Result<bool, DraftError> {
        let next: Vec<Product> = self.products.iter().filter(|p| p.id != id).cloned().collect();
        let removed = next.len() != self.products.len();

        self.commit(next)?;
        Ok(removed)
    }

    /// Normalizes `products` and makes them the whole draft.
    pub fn replace_all(&mut self, products: Vec<Product>) -> Result<(), DraftError> {
        let next = self.normalizer.normalize_all(products);
        self.commit(next)
    }

    /// Id the next created product will get.
    ///
    /// When the largest id is already `i64::MAX`, falls back to the smallest
    /// positive id not in use.
    pub fn next_id(&self) -> i64 {
        match self.products.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1).unwrap_or_else(|| {
                tracing::warn!("Largest product id is at the limit, reusing a free id");
                self.smallest_free_id()
            }),
            None => match self.id_strategy {
                IdStrategy::Sequential => 1,
                IdStrategy::Timestamp => Utc::now().timestamp_millis(),
            },
        }
    }

    fn smallest_free_id(&self) -> i64 {
        let used: HashSet<i64> = self.products.iter().map(|p| p.id).collect();
        // The draft is finite, so a free id exists well before the limit
        (1..i64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<(), DraftError> {
        let contents = serde_json::to_string(&next)?;
        self.cache.write(&self.key, &contents)?;
        self.products = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{FileCache, MemoryCache};
    use crate::models::DEFAULT_PLACEHOLDER_IMAGE;
    use std::collections::HashSet;
    use tempfile::TempDir;

    struct BrokenCache;

    impl DraftCache for BrokenCache {
        fn read(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Io {
                path: "/broken".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn write(&mut self, _key: &str, _contents: &str) -> Result<(), CacheError> {
            Err(CacheError::Io {
                path: "/broken".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn pizza() -> ProductFields {
        ProductFields::new("Pizza", 120.0, "https://x.io/pizza.png")
    }

    fn store_with(json: &str) -> DraftStore<MemoryCache> {
        let cache = MemoryCache::new().with_entry(DEFAULT_CACHE_KEY, json);
        let mut store = DraftStore::new(cache).with_id_strategy(IdStrategy::Sequential);
        store.load();
        store
    }

    #[test]
    fn test_load_missing_cache_is_empty() {
        let mut store = DraftStore::new(MemoryCache::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_malformed_cache_is_empty() {
        assert!(store_with("{not json").is_empty());
        assert!(store_with("{\"id\": 1}").is_empty());
        assert!(store_with("").is_empty());
    }

    #[test]
    fn test_load_unreadable_cache_is_empty() {
        let mut store = DraftStore::new(BrokenCache);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_normalizes_records() {
        let store = store_with(r#"[{"id":1,"name":"A","price":10}]"#);

        assert_eq!(store.len(), 1);
        let product = &store.products()[0];
        assert_eq!(product.description, "");
        assert_eq!(product.image, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let store = store_with(
            r#"[{"id":1,"name":"A","price":10},{"id":1,"name":"B","price":20},{"id":2,"name":"C","price":30}]"#,
        );
        let ids: Vec<i64> = store.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_save_load_roundtrip_with_file_cache() {
        let temp_dir = TempDir::new().unwrap();

        let mut store = DraftStore::new(FileCache::new(temp_dir.path()))
            .with_id_strategy(IdStrategy::Sequential);
        store.upsert(None, pizza().with_description("Cheesy")).unwrap();
        store
            .upsert(None, ProductFields::new("Soda", 25.0, "undefined"))
            .unwrap();
        store.save().unwrap();

        let mut reloaded = DraftStore::new(FileCache::new(temp_dir.path()));
        reloaded.load();

        let expected = store.normalizer().normalize_all(store.products().to_vec());
        assert_eq!(reloaded.products(), expected.as_slice());
        assert_eq!(reloaded.products()[1].image, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_custom_key() {
        let mut store = DraftStore::new(MemoryCache::new()).with_key("other");
        store.upsert(None, pizza()).unwrap();
        assert!(store.cache().get("other").is_some());
        assert!(store.cache().get(DEFAULT_CACHE_KEY).is_none());
    }

    #[test]
    fn test_create_on_empty_sequential_assigns_one() {
        let mut store = DraftStore::new(MemoryCache::new()).with_id_strategy(IdStrategy::Sequential);
        assert_eq!(store.upsert(None, pizza()).unwrap(), UpsertOutcome::Created(1));
    }

    #[test]
    fn test_create_on_empty_timestamp_assigns_current_millis() {
        let before = Utc::now().timestamp_millis();
        let mut store = DraftStore::new(MemoryCache::new()).with_id_strategy(IdStrategy::Timestamp);
        let outcome = store.upsert(None, pizza()).unwrap();
        let after = Utc::now().timestamp_millis();

        match outcome {
            UpsertOutcome::Created(id) => assert!(id >= before && id <= after),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_create_after_max_five_assigns_six() {
        let mut store = store_with(
            r#"[{"id":5,"name":"A","price":10},{"id":2,"name":"B","price":20}]"#,
        );
        assert_eq!(store.upsert(None, pizza()).unwrap(), UpsertOutcome::Created(6));
        assert_eq!(store.products().last().unwrap().id, 6);
    }

    #[test]
    fn test_create_after_max_i64_reuses_free_id() {
        let mut store = store_with(r#"[{"id":9223372036854775807,"name":"A","price":1}]"#);
        assert_eq!(store.upsert(None, pizza()).unwrap(), UpsertOutcome::Created(1));

        store.upsert(None, pizza()).unwrap();
        let ids: Vec<i64> = store.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![i64::MAX, 1, 2]);
    }

    #[test]
    fn test_create_persists() {
        let mut store = DraftStore::new(MemoryCache::new()).with_id_strategy(IdStrategy::Sequential);
        store.upsert(None, pizza()).unwrap();

        let cached: Vec<Product> =
            serde_json::from_str(store.cache().get(DEFAULT_CACHE_KEY).unwrap()).unwrap();
        assert_eq!(cached, store.products());
    }

    #[test]
    fn test_update_merges_fields_in_place() {
        let mut store = store_with(
            r#"[{"id":1,"name":"A","price":10,"description":"first"},{"id":2,"name":"B","price":20}]"#,
        );

        let outcome = store
            .upsert(Some(1), ProductFields::new("A2", 11.0, "https://x.io/a2.png"))
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated(1));
        let product = &store.products()[0];
        assert_eq!(product.name, "A2");
        assert_eq!(product.price, 11.0);
        assert_eq!(product.description, "first");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_unknown_id_ignored_by_default() {
        let mut store = store_with(r#"[{"id":1,"name":"A","price":10}]"#);
        let before = store.products().to_vec();

        let outcome = store.upsert(Some(99), pizza()).unwrap();

        assert_eq!(outcome, UpsertOutcome::Ignored(99));
        assert_eq!(store.products(), before.as_slice());
    }

    #[test]
    fn test_update_unknown_id_rejected_when_configured() {
        let mut store = store_with(r#"[{"id":1,"name":"A","price":10}]"#)
            .with_unknown_id_policy(UnknownIdPolicy::Reject);

        let err = store.upsert(Some(99), pizza()).unwrap_err();
        assert!(matches!(err, DraftError::UnknownProduct(99)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = store_with(
            r#"[{"id":1,"name":"A","price":10},{"id":2,"name":"B","price":20}]"#,
        );

        assert!(store.remove(1).unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.get(1).is_none());
        assert!(store.get(2).is_some());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = store_with(r#"[{"id":1,"name":"A","price":10}]"#);
        let before = store.products().to_vec();

        assert!(!store.remove(42).unwrap());
        assert_eq!(store.products(), before.as_slice());
    }

    #[test]
    fn test_failed_write_leaves_draft_untouched() {
        let mut store = DraftStore::new(BrokenCache).with_id_strategy(IdStrategy::Sequential);

        let err = store.upsert(None, pizza()).unwrap_err();
        assert!(matches!(err, DraftError::Cache(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut store = DraftStore::new(MemoryCache::new()).with_id_strategy(IdStrategy::Sequential);
        for _ in 0..5 {
            store.upsert(None, pizza()).unwrap();
        }
        store.remove(3).unwrap();
        store.upsert(None, pizza()).unwrap();
        store.remove(6).unwrap();
        store.upsert(None, pizza()).unwrap();

        let ids: HashSet<i64> = store.products().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn test_replace_all_normalizes_and_persists() {
        let mut store = store_with(r#"[{"id":1,"name":"A","price":10}]"#);

        store
            .replace_all(vec![
                Product::new(7, "X", 1.0, ""),
                Product::new(7, "Dup", 2.0, "https://x.io/d.png"),
            ])
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].image, DEFAULT_PLACEHOLDER_IMAGE);

        let cached: Vec<Product> =
            serde_json::from_str(store.cache().get(DEFAULT_CACHE_KEY).unwrap()).unwrap();
        assert_eq!(cached, store.products());
    }
}
