use crate::StoreError;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Minimal bucket/object map used to stage version source bundles.
#[derive(Debug, Default)]
pub struct BucketStore {
    buckets: HashMap<String, BTreeMap<String, Vec<u8>>>,
}

impl BucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket. Creating an existing bucket keeps its objects.
    pub fn create_bucket(&mut self, bucket: &str) {
        debug!("creating bucket '{bucket}'");
        self.buckets.entry(bucket.to_owned()).or_default();
    }

    pub fn bucket_exists(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    pub fn put_object(&mut self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let objects = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_owned()))?;
        debug!("putting {} bytes at {bucket}/{key}", body.len());
        objects.insert(key.to_owned(), body);
        Ok(())
    }

    pub fn get_object(&self, bucket: &str, key: &str) -> Result<&[u8], StoreError> {
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_owned()))?;
        objects
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::ObjectNotFound {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })
    }

    pub fn list_keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_object() {
        let mut store = BucketStore::new();
        store.create_bucket("bundles");
        store
            .put_object("bundles", "app/v1.zip", b"zipdata".to_vec())
            .unwrap();
        assert_eq!(store.get_object("bundles", "app/v1.zip").unwrap(), b"zipdata");
        assert_eq!(store.list_keys("bundles"), vec!["app/v1.zip"]);
    }

    #[test]
    fn put_into_missing_bucket_fails() {
        let mut store = BucketStore::new();
        let err = store.put_object("nope", "k", Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::BucketNotFound(ref b) if b == "nope"));
    }

    #[test]
    fn recreating_bucket_keeps_objects() {
        let mut store = BucketStore::new();
        store.create_bucket("b");
        store.put_object("b", "k", b"v".to_vec()).unwrap();
        store.create_bucket("b");
        assert!(store.get_object("b", "k").is_ok());
    }

    #[test]
    fn missing_object_is_reported() {
        let mut store = BucketStore::new();
        store.create_bucket("b");
        let err = store.get_object("b", "k").unwrap_err();
        assert!(err.to_string().contains("b/k"));
    }
}
