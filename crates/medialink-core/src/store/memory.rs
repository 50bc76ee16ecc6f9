//! In-memory object store.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::{ListObjectsRequest, ObjectListing, ObjectStore, StoreError, StoreResult};
use crate::model::{ObjectDescriptor, StorageClass};

/// [`ObjectStore`] over a sorted in-process map.
///
/// Presigned URLs have the form `memory://{bucket}/{key}?expires={secs}`.
/// Every call is counted, and individual calls can be made to fail, so
/// callers can assert on exactly which store calls an operation made.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    bucket: String,
    objects: RwLock<BTreeMap<String, ObjectDescriptor>>,
    failures: Mutex<Failures>,
    list_calls: AtomicUsize,
    head_calls: AtomicUsize,
    presign_calls: AtomicUsize,
}

#[derive(Debug, Default)]
struct Failures {
    list: Option<String>,
    head: HashSet<String>,
    presign: HashSet<String>,
}

impl InMemoryObjectStore {
    /// Create an empty store for `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Add or replace an object.
    pub fn insert(&self, object: ObjectDescriptor) {
        self.objects.write().insert(object.key.clone(), object);
    }

    /// Add a `STANDARD` object of `size` bytes.
    pub fn put(&self, key: &str, size: i64) {
        self.insert(ObjectDescriptor::new(key, size, StorageClass::Standard));
    }

    /// Make every listing fail with `message`.
    pub fn fail_list(&self, message: impl Into<String>) {
        self.failures.lock().list = Some(message.into());
    }

    /// Make the existence check of `key` fail.
    pub fn fail_head(&self, key: impl Into<String>) {
        self.failures.lock().head.insert(key.into());
    }

    /// Make presigning `key` fail.
    pub fn fail_presign(&self, key: impl Into<String>) {
        self.failures.lock().presign.insert(key.into());
    }

    /// Number of listing calls made so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of existence checks made so far.
    #[must_use]
    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    /// Number of presign calls made so far.
    #[must_use]
    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    /// Number of calls of any kind made so far.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.head_calls() + self.presign_calls()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_objects(&self, request: ListObjectsRequest) -> StoreResult<ObjectListing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failures.lock().list.clone() {
            return Err(StoreError::request("ListObjectsV2", message));
        }

        let max_keys = usize::try_from(request.max_keys).unwrap_or(0);
        let objects = self.objects.read();
        let mut matching = objects
            .values()
            .filter(|o| o.key.starts_with(&request.prefix))
            .filter(|o| {
                request
                    .continuation_token
                    .as_deref()
                    .is_none_or(|after| o.key.as_str() > after)
            });

        let page: Vec<ObjectDescriptor> = matching.by_ref().take(max_keys).cloned().collect();
        let next_continuation_token = if matching.next().is_some() {
            page.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ObjectListing {
            objects: page,
            next_continuation_token,
        })
    }

    async fn object_exists(&self, key: &str) -> StoreResult<bool> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().head.contains(key) {
            return Err(StoreError::request("HeadObject", format!("injected failure for {key}")));
        }
        Ok(self.objects.read().contains_key(key))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> StoreResult<String> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().presign.contains(key) {
            return Err(StoreError::request(
                "PresignGetObject",
                format!("injected failure for {key}"),
            ));
        }
        Ok(format!(
            "memory://{}/{key}?expires={}",
            self.bucket,
            ttl.as_secs()
        ))
    }
}
