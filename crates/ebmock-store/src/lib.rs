//! In-memory resource store for ebmock.
//!
//! This crate provides the storage layer: `ResourceStore` owns the ordered
//! collections of applications, application versions, and environments and
//! exposes first-match lookup, filtered listing, and in-place update
//! primitives. `BucketStore` is the bucket/object map that backs source
//! bundle uploads. Nothing here validates requests; that is the engine's job.

pub mod buckets;
pub mod records;
pub mod resources;

pub use buckets::BucketStore;
pub use records::{
    Application, ApplicationVersion, Environment, EnvironmentHealth, EnvironmentStatus,
};
pub use resources::{EnvironmentFilter, EnvironmentKey, ResourceStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("application not found: {0}")]
    ApplicationNotFound(String),
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_application_not_found() {
        let e = StoreError::ApplicationNotFound("myapp".to_owned());
        assert!(e.to_string().contains("application not found"));
        assert!(e.to_string().contains("myapp"));
    }

    #[test]
    fn store_error_display_environment_not_found() {
        let e = StoreError::EnvironmentNotFound("e-abcdefghij".to_owned());
        assert!(e.to_string().contains("e-abcdefghij"));
    }

    #[test]
    fn store_error_display_bucket_not_found() {
        let e = StoreError::BucketNotFound("bundles".to_owned());
        assert!(e.to_string().contains("bundles"));
    }

    #[test]
    fn store_error_display_object_not_found() {
        let e = StoreError::ObjectNotFound {
            bucket: "b".to_owned(),
            key: "k".to_owned(),
        };
        assert_eq!(e.to_string(), "object not found: b/k");
    }
}
