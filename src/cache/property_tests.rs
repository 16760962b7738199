//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{Cache, PutOutcome};

// == Strategies ==
/// Small key space so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "/[a-f]".prop_map(|s| s)
}

fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, content: Vec<u8> },
    Get { key: String },
    MarkDirty { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), content_strategy())
            .prop_map(|(key, content)| CacheOp::Put { key, content }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::MarkDirty { key }),
    ]
}

// == Reference Model ==
/// Vec-based LRU: front is most recently used.
#[derive(Default)]
struct Model {
    order: Vec<String>,
    contents: HashMap<String, (Vec<u8>, bool)>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn touch(&mut self, key: &str) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(pos) => {
                let k = self.order.remove(pos);
                self.order.insert(0, k);
                true
            }
            None => false,
        }
    }

    fn put(&mut self, key: &str, content: &[u8]) {
        if self.touch(key) {
            let slot = self.contents.get_mut(key).unwrap();
            if slot.1 {
                *slot = (content.to_vec(), false);
            }
            return;
        }
        self.order.insert(0, key.to_string());
        self.contents.insert(key.to_string(), (content.to_vec(), false));
        if self.order.len() > self.capacity {
            let evicted = self.order.pop().unwrap();
            self.contents.remove(&evicted);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations the cache matches the model: same
    // recency order, same contents, same dirty flags, and never more than
    // max_size entries.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..5,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut cache = Cache::new(capacity, 0).unwrap();
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Put { key, content } => {
                    cache.put(&key, "application/octet-stream", &content).unwrap();
                    model.put(&key, &content);
                }
                CacheOp::Get { key } => {
                    let hit = cache.get(&key).is_some();
                    prop_assert_eq!(hit, model.touch(&key));
                }
                CacheOp::MarkDirty { key } => {
                    if let Some(entry) = cache.get(&key) {
                        entry.mark_dirty();
                    }
                    if model.touch(&key) {
                        model.contents.get_mut(&key).unwrap().1 = true;
                    }
                }
            }

            cache.check_invariants();
            prop_assert!(cache.len() <= capacity);
            let cache_keys: Vec<&str> = cache.keys().collect();
            prop_assert_eq!(cache_keys, model.order.iter().map(String::as_str).collect::<Vec<_>>());
        }

        for entry in cache.iter() {
            let (content, dirty) = &model.contents[entry.key()];
            prop_assert_eq!(entry.content(), content.as_slice());
            prop_assert_eq!(entry.is_dirty(), *dirty);
        }
    }

    // After a hit on get or put, the touched key is the head.
    #[test]
    fn prop_access_moves_to_head(
        keys in prop::collection::vec(key_strategy(), 1..20),
        pick in any::<prop::sample::Index>(),
        via_put in any::<bool>()
    ) {
        let mut cache = Cache::new(16, 0).unwrap();
        for key in &keys {
            cache.put(key, "text/plain", key.as_bytes()).unwrap();
        }

        let target = pick.get(&keys).clone();
        if via_put {
            let outcome = cache.put(&target, "text/plain", b"ignored").unwrap();
            prop_assert_eq!(outcome, PutOutcome::Unchanged);
        } else {
            prop_assert!(cache.get(&target).is_some());
        }

        prop_assert_eq!(cache.keys().next(), Some(target.as_str()));
    }

    // put then get returns the same content type, length and bytes.
    #[test]
    fn prop_roundtrip_storage(
        key in "/[a-z0-9_./]{1,32}",
        content_type in "[a-z]{1,8}/[a-z0-9.+-]{1,16}",
        content in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let mut cache = Cache::new(4, 0).unwrap();
        cache.put(&key, &content_type, &content).unwrap();

        let entry = cache.get(&key).unwrap();
        prop_assert_eq!(entry.content_type(), content_type.as_str());
        prop_assert_eq!(entry.content_length(), content.len());
        prop_assert_eq!(entry.content(), content.as_slice());
    }

    // A repeated identical put on a clean key changes nothing.
    #[test]
    fn prop_clean_put_idempotent(
        key in key_strategy(),
        content in content_strategy()
    ) {
        let mut cache = Cache::new(4, 0).unwrap();

        cache.put(&key, "text/plain", &content).unwrap();
        let after_first = cache.peek(&key).unwrap().clone();
        cache.put(&key, "text/plain", &content).unwrap();
        let after_second = cache.peek(&key).unwrap().clone();

        prop_assert_eq!(after_first, after_second);
        prop_assert_eq!(cache.len(), 1);
    }

    // Filling past capacity evicts in exact insertion order when nothing
    // is re-accessed.
    #[test]
    fn prop_lru_eviction_order(capacity in 1usize..8, extra in 1usize..8) {
        let mut cache = Cache::new(capacity, 0).unwrap();
        let mut evicted = Vec::new();

        for i in 0..capacity + extra {
            let key = format!("/file{}", i);
            if let PutOutcome::Inserted { evicted: Some(entry) } =
                cache.put(&key, "text/plain", b"x").unwrap()
            {
                evicted.push(entry.key().to_string());
            }
        }

        let expected: Vec<String> = (0..extra).map(|i| format!("/file{}", i)).collect();
        prop_assert_eq!(evicted, expected);
        prop_assert_eq!(cache.len(), capacity);
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error variant renders as JSON with a string "error" field that
    // carries the error's message.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::InvalidArgument(error_msg.clone()),
            CacheError::Allocation(error_msg.clone()),
            CacheError::NotFound(error_msg.clone()),
            CacheError::Internal(error_msg.clone()),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}
