//! In-memory object store for tests and local runs

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use super::ObjectStore;
use crate::domain::AnalysisError;

/// Object store backed by a map of bucket -> key -> bytes.
///
/// Keys list in lexicographic order, matching S3 listing semantics.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, Bytes>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket so listings under it succeed.
    pub fn create_bucket(&self, bucket: impl Into<String>) {
        let mut buckets = self.buckets.write().expect("object store lock poisoned");
        buckets.entry(bucket.into()).or_default();
    }

    /// Store an object, creating the bucket if needed.
    pub fn put(&self, bucket: impl Into<String>, key: impl Into<String>, data: impl Into<Bytes>) {
        let mut buckets = self.buckets.write().expect("object store lock poisoned");
        buckets
            .entry(bucket.into())
            .or_default()
            .insert(key.into(), data.into());
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, AnalysisError> {
        let buckets = self.buckets.read().expect("object store lock poisoned");
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| AnalysisError::source_unavailable(format!("no such bucket '{bucket}'")))?;
        Ok(objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, AnalysisError> {
        let buckets = self.buckets.read().expect("object store lock poisoned");
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| {
                AnalysisError::source_unavailable(format!("no such object '{bucket}/{key}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_filters_by_prefix_in_order() {
        let store = InMemoryObjectStore::new();
        store.put("logs", "vpc-flow-logs/b.txt", Bytes::from_static(b"b"));
        store.put("logs", "vpc-flow-logs/a.txt", Bytes::from_static(b"a"));
        store.put("logs", "other/c.txt", Bytes::from_static(b"c"));

        let keys = store.list("logs", "vpc-flow-logs/").await.unwrap();
        assert_eq!(keys, vec!["vpc-flow-logs/a.txt", "vpc-flow-logs/b.txt"]);
    }

    #[tokio::test]
    async fn test_missing_bucket_is_unavailable() {
        let store = InMemoryObjectStore::new();
        let error = store.list("absent", "").await.unwrap_err();
        assert!(matches!(
            error,
            AnalysisError::SourceUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let store = InMemoryObjectStore::new();
        store.put("b", "k", Bytes::from_static(b"payload"));
        assert_eq!(store.get("b", "k").await.unwrap(), Bytes::from_static(b"payload"));
    }
}
