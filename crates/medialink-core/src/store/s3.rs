//! S3-backed object store.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::debug;

use super::{ListObjectsRequest, ObjectListing, ObjectStore, StoreError, StoreResult};
use crate::config::{MediaConfig, STORAGE_REGION};
use crate::model::{ObjectDescriptor, StorageClass};

/// Build an S3 client pinned to [`STORAGE_REGION`].
///
/// Credentials come from the default provider chain. When a custom endpoint
/// is configured (e.g. a local emulator), path-style addressing is enabled.
pub async fn build_s3_client(config: &MediaConfig) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(STORAGE_REGION));

    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    Client::from_conf(s3_config)
}

/// [`ObjectStore`] backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build the client and bind it to the configured bucket.
    pub async fn from_config(config: &MediaConfig) -> Self {
        let client = build_s3_client(config).await;
        Self::new(client, config.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(&self, request: ListObjectsRequest) -> StoreResult<ObjectListing> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&request.prefix)
            .max_keys(request.max_keys);

        if let Some(token) = request.continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| {
            StoreError::request("ListObjectsV2", DisplayErrorContext(&e).to_string())
        })?;

        let objects: Vec<ObjectDescriptor> = resp.contents().iter().map(to_descriptor).collect();

        debug!(
            bucket = %self.bucket,
            prefix = %request.prefix,
            count = objects.len(),
            is_truncated = ?resp.is_truncated(),
            "list_objects_v2 completed"
        );

        Ok(ObjectListing {
            objects,
            next_continuation_token: resp.next_continuation_token().map(ToOwned::to_owned),
        })
    }

    async fn object_exists(&self, key: &str) -> StoreResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(HeadObjectError::is_not_found) => Ok(false),
            Err(e) => Err(StoreError::request(
                "HeadObject",
                DisplayErrorContext(&e).to_string(),
            )),
        }
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> StoreResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| StoreError::request("PresignGetObject", e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                StoreError::request("PresignGetObject", DisplayErrorContext(&e).to_string())
            })?;

        Ok(request.uri().to_owned())
    }
}

/// Convert an SDK listing entry into an [`ObjectDescriptor`].
fn to_descriptor(obj: &aws_sdk_s3::types::Object) -> ObjectDescriptor {
    ObjectDescriptor {
        key: obj.key().unwrap_or_default().to_owned(),
        size: obj.size(),
        storage_class: obj
            .storage_class()
            .map(|class| StorageClass::from(class.as_str())),
    }
}
