//! Domain types shared by the store, the operations, and the HTTP layer.

use std::fmt;

use serde::Serialize;

use crate::config::DEFAULT_MAX_KEYS;

/// Storage tier of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageClass {
    /// `STANDARD`
    Standard,
    /// `REDUCED_REDUNDANCY`
    ReducedRedundancy,
    /// `STANDARD_IA`
    StandardIa,
    /// `ONEZONE_IA`
    OnezoneIa,
    /// `INTELLIGENT_TIERING`
    IntelligentTiering,
    /// `GLACIER`
    Glacier,
    /// `GLACIER_IR`
    GlacierIr,
    /// `DEEP_ARCHIVE`
    DeepArchive,
    /// Any tier this crate does not know by name.
    Other(String),
}

impl StorageClass {
    /// Wire name of the tier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "STANDARD",
            Self::ReducedRedundancy => "REDUCED_REDUNDANCY",
            Self::StandardIa => "STANDARD_IA",
            Self::OnezoneIa => "ONEZONE_IA",
            Self::IntelligentTiering => "INTELLIGENT_TIERING",
            Self::Glacier => "GLACIER",
            Self::GlacierIr => "GLACIER_IR",
            Self::DeepArchive => "DEEP_ARCHIVE",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for StorageClass {
    fn from(s: &str) -> Self {
        match s {
            "STANDARD" => Self::Standard,
            "REDUCED_REDUNDANCY" => Self::ReducedRedundancy,
            "STANDARD_IA" => Self::StandardIa,
            "ONEZONE_IA" => Self::OnezoneIa,
            "INTELLIGENT_TIERING" => Self::IntelligentTiering,
            "GLACIER" => Self::Glacier,
            "GLACIER_IR" => Self::GlacierIr,
            "DEEP_ARCHIVE" => Self::DeepArchive,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// Object key.
    pub key: String,
    /// Size in bytes as reported by the store. `None` when absent.
    pub size: Option<i64>,
    /// Storage tier as reported by the store. `None` when absent.
    pub storage_class: Option<StorageClass>,
}

impl ObjectDescriptor {
    /// Create a descriptor with a known size and tier.
    #[must_use]
    pub fn new(key: impl Into<String>, size: i64, storage_class: StorageClass) -> Self {
        Self {
            key: key.into(),
            size: Some(size),
            storage_class: Some(storage_class),
        }
    }
}

/// A time-limited download URL for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    /// Object key.
    pub key: String,
    /// Presigned GET URL.
    pub url: String,
    /// Validity in seconds, reported for single-object retrieval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Validated input of the list-media operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMediaInput {
    /// Raw prefix, normalized by the operation.
    pub prefix: String,
    /// Page size, always positive.
    pub max_keys: i32,
    /// Required key suffix (e.g. `.jpg`). Empty matches everything.
    pub file_extension: String,
    /// Opaque cursor forwarded to the store.
    pub continuation_token: Option<String>,
}

impl Default for ListMediaInput {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            max_keys: DEFAULT_MAX_KEYS,
            file_extension: String::new(),
            continuation_token: None,
        }
    }
}

/// Validated input of the get-media operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMediaInput {
    /// Object key, never empty.
    pub key: String,
}

/// Result of the list-media operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMediaOutput {
    /// Signed URLs in listing order.
    pub contents: Vec<SignedUrl>,
    /// Cursor for the next page, if the store reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_continuation_token: Option<String>,
}
