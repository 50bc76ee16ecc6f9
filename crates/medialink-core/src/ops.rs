//! Media operations: list-media and get-media.
//!
//! Both operations run against one [`ObjectStore`] and one [`MediaConfig`],
//! held by [`MediaService`] for the lifetime of the process.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};
use crate::model::{GetMediaInput, ListMediaInput, ListMediaOutput, ObjectDescriptor, SignedUrl};
use crate::prefix::normalize_prefix;
use crate::store::{ListObjectsRequest, ObjectStore};

/// Validity of URLs issued by a listing.
pub const LIST_URL_TTL: Duration = Duration::from_secs(6 * 3600);

/// Validity of the URL issued for a single object.
pub const GET_URL_TTL: Duration = Duration::from_secs(24 * 3600);

/// Lists objects and issues signed URLs for them.
#[derive(Debug, Clone)]
pub struct MediaService {
    store: Arc<dyn ObjectStore>,
    config: Arc<MediaConfig>,
}

impl MediaService {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: MediaConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// List one page of objects under a prefix and sign every one that passes
    /// the configured filter.
    ///
    /// Signing runs concurrently and fails fast: if any object cannot be
    /// signed (or, with existence checks enabled, checked), the whole call
    /// fails and no partial result is returned.
    pub async fn list_media(&self, input: ListMediaInput) -> MediaResult<ListMediaOutput> {
        let prefix = normalize_prefix(&input.prefix);
        let policy = self.config.filter_policy;
        if !policy.uses_suffix() && !input.file_extension.is_empty() {
            debug!(%policy, file_extension = %input.file_extension, "file extension ignored");
        }

        let listing = self
            .store
            .list_objects(ListObjectsRequest {
                prefix: prefix.clone(),
                max_keys: input.max_keys,
                continuation_token: input.continuation_token,
            })
            .await?;

        let listed = listing.objects.len();
        let admitted: Vec<ObjectDescriptor> = listing
            .objects
            .into_iter()
            .filter(|o| policy.admits(o, &input.file_extension))
            .collect();

        debug!(
            %prefix,
            %policy,
            listed,
            admitted = admitted.len(),
            "filtered listing"
        );

        let contents = self.sign_all(admitted).await?;

        info!(%prefix, count = contents.len(), "issued signed urls");

        Ok(ListMediaOutput {
            contents,
            next_continuation_token: listing.next_continuation_token,
        })
    }

    /// Sign a single object after confirming it exists.
    pub async fn get_media(&self, input: GetMediaInput) -> MediaResult<SignedUrl> {
        let key = input.key;

        if !self.store.object_exists(&key).await? {
            return Err(MediaError::not_found(format!("object '{key}' does not exist")));
        }

        let url = self.store.presign_get(&key, GET_URL_TTL).await?;
        info!(%key, "issued signed url");

        Ok(SignedUrl {
            key,
            url,
            expires_in: Some(GET_URL_TTL.as_secs()),
        })
    }

    /// Sign every object concurrently, preserving input order.
    async fn sign_all(&self, objects: Vec<ObjectDescriptor>) -> MediaResult<Vec<SignedUrl>> {
        let branches = objects.into_iter().map(|o| self.sign_one(o.key));

        match self.config.sign_concurrency {
            None => try_join_all(branches).await,
            Some(limit) => {
                stream::iter(branches)
                    .buffered(limit)
                    .try_collect()
                    .await
            }
        }
    }

    async fn sign_one(&self, key: String) -> MediaResult<SignedUrl> {
        if self.config.verify_existence && !self.store.object_exists(&key).await? {
            return Err(MediaError::not_found(format!("object '{key}' does not exist")));
        }

        let url = self.store.presign_get(&key, LIST_URL_TTL).await?;
        Ok(SignedUrl {
            key,
            url,
            expires_in: None,
        })
    }
}
