//! Process-wide configuration.
//!
//! [`MediaConfig`] is resolved once at cold start from environment variables
//! and handed to the store and the service explicitly. Nothing below the
//! entry point reads the environment on its own.

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::filter::FilterPolicy;

/// Bucket served when `TARGET_BUCKET_NAME` is unset.
pub const DEFAULT_BUCKET: &str = "philips-glacier";

/// Region the storage client is pinned to.
pub const STORAGE_REGION: &str = "us-east-1";

/// Page size used when the caller does not pass `max` or `limit`.
pub const DEFAULT_MAX_KEYS: i32 = 50;

/// medialink configuration.
///
/// # Examples
///
/// ```
/// use medialink_core::config::MediaConfig;
///
/// let config = MediaConfig::default();
/// assert_eq!(config.bucket, "philips-glacier");
/// assert!(config.sign_concurrency.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    /// Bucket all operations run against.
    #[builder(default = String::from(DEFAULT_BUCKET))]
    pub bucket: String,

    /// Which objects a listing surfaces.
    #[builder(default)]
    pub filter_policy: FilterPolicy,

    /// HEAD-check every listed object before signing it.
    #[builder(default = false)]
    pub verify_existence: bool,

    /// Upper bound on concurrent signing branches. `None` means unbounded.
    #[builder(default)]
    pub sign_concurrency: Option<usize>,

    /// Custom S3 endpoint, e.g. a local emulator. Enables path-style addressing.
    #[builder(default)]
    pub s3_endpoint: Option<String>,

    /// Bind address for the local gateway server.
    #[builder(default = String::from("0.0.0.0:3000"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MediaConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TARGET_BUCKET_NAME` | `philips-glacier` |
    /// | `MEDIALINK_FILTER_POLICY` | `exclude-glacier` |
    /// | `MEDIALINK_VERIFY_EXISTENCE` | `false` |
    /// | `MEDIALINK_SIGN_CONCURRENCY` | *(unbounded)* |
    /// | `MEDIALINK_S3_ENDPOINT` | *(unset)* |
    /// | `GATEWAY_LISTEN` | `0.0.0.0:3000` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Values that fail to parse keep their default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("TARGET_BUCKET_NAME") {
            if !v.trim().is_empty() {
                config.bucket = v;
            }
        }
        if let Some(v) = lookup("MEDIALINK_FILTER_POLICY") {
            match v.parse::<FilterPolicy>() {
                Ok(policy) => config.filter_policy = policy,
                Err(e) => warn!(value = %v, error = %e, "ignoring MEDIALINK_FILTER_POLICY"),
            }
        }
        if let Some(v) = lookup("MEDIALINK_VERIFY_EXISTENCE") {
            config.verify_existence = parse_bool(&v);
        }
        if let Some(v) = lookup("MEDIALINK_SIGN_CONCURRENCY") {
            match v.trim().parse::<usize>() {
                Ok(0) => config.sign_concurrency = None,
                Ok(n) => config.sign_concurrency = Some(n),
                Err(_) => warn!(value = %v, "ignoring MEDIALINK_SIGN_CONCURRENCY"),
            }
        }
        if let Some(v) = lookup("MEDIALINK_S3_ENDPOINT") {
            if !v.trim().is_empty() {
                config.s3_endpoint = Some(v);
            }
        }
        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
