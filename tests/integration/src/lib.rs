//! Integration tests for medialink.
//!
//! Store and gateway tests need an S3-compatible emulator at `S3_ENDPOINT_URL`
//! (default `http://localhost:4566`). Server tests additionally need a running
//! `medialink-server` at `MEDIALINK_ENDPOINT_URL` (default
//! `http://localhost:3000`). All of them are marked `#[ignore]` so they don't
//! run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p medialink-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use medialink_core::config::STORAGE_REGION;
use medialink_core::{MediaConfig, MediaService, ObjectStore, S3ObjectStore};
use medialink_http::MediaGateway;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL of the S3 emulator.
fn s3_endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Base URL of a running `medialink-server`.
#[must_use]
pub fn medialink_url(path_and_query: &str) -> String {
    let base = std::env::var("MEDIALINK_ENDPOINT_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_owned());
    format!("{}{path_and_query}", base.trim_end_matches('/'))
}

/// Create a configured S3 client pointing at the emulator.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(STORAGE_REGION))
        .credentials_provider(creds)
        .endpoint_url(s3_endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &aws_sdk_s3::Client, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    client
        .create_bucket()
        .bucket(&name)
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// Upload `body` under `key` with the given storage class.
pub async fn put_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: &'static [u8],
    storage_class: StorageClass,
) {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .storage_class(storage_class)
        .body(ByteStream::from_static(body))
        .send()
        .await
        .unwrap_or_else(|e| panic!("put {key}: {e}"));
}

/// Upload a small `STANDARD` object under each key.
pub async fn seed_bucket(client: &aws_sdk_s3::Client, bucket: &str, keys: &[&str]) {
    for key in keys {
        put_object(client, bucket, key, b"media", StorageClass::Standard).await;
    }
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return; // Bucket may not exist.
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

/// S3-backed store bound to `bucket`, using the emulator client.
#[must_use]
pub fn s3_store(client: &aws_sdk_s3::Client, bucket: &str) -> S3ObjectStore {
    S3ObjectStore::new(client.clone(), bucket)
}

/// In-process gateway over the emulator bucket.
#[must_use]
pub fn gateway(client: &aws_sdk_s3::Client, bucket: &str) -> MediaGateway<MediaService> {
    let config = MediaConfig::builder().bucket(bucket.to_owned()).build();
    let store: Arc<dyn ObjectStore> = Arc::new(s3_store(client, bucket));
    MediaGateway::new(MediaService::new(store, config))
}

mod test_gateway;
mod test_server;
mod test_store;
