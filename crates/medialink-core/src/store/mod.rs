//! Object store gateway.
//!
//! [`ObjectStore`] is the seam between the media operations and the storage
//! service. It exposes exactly the three calls the operations need: a single
//! page listing, an existence check, and presigning a GET.
//!
//! - [`S3ObjectStore`] talks to S3 through `aws-sdk-s3`.
//! - [`InMemoryObjectStore`] keeps objects in a map, counts calls, and can be
//!   told to fail. Used by tests and local development.

mod memory;
mod s3;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::InMemoryObjectStore;
pub use s3::{S3ObjectStore, build_s3_client};

use crate::model::ObjectDescriptor;

/// A failed call to the object store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    /// Store operation that failed (e.g. `ListObjectsV2`).
    pub operation: &'static str,
    /// Error detail as reported by the store client.
    pub message: String,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn request(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Convenience result type for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Parameters of a single-page listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsRequest {
    /// Normalized key prefix.
    pub prefix: String,
    /// Maximum number of keys to return. Positive.
    pub max_keys: i32,
    /// Cursor from a previous page.
    pub continuation_token: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Objects in key order.
    pub objects: Vec<ObjectDescriptor>,
    /// Cursor for the next page, when the listing was truncated.
    pub next_continuation_token: Option<String>,
}

/// Operations the media service needs from an object store.
///
/// Implementations are bound to one bucket for their whole lifetime.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// List one page of objects under a prefix.
    async fn list_objects(&self, request: ListObjectsRequest) -> StoreResult<ObjectListing>;

    /// Check whether `key` exists. A not-found answer is `Ok(false)`.
    async fn object_exists(&self, key: &str) -> StoreResult<bool>;

    /// Produce a GET URL for `key` valid for `ttl`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> StoreResult<String>;
}
