//! Object listing, filtering, and signed URL issuing for medialink.
//!
//! medialink sits between an API gateway and an S3 bucket. It lists one page
//! of objects under a prefix, keeps the ones that can be downloaded right
//! away, and hands out time-limited presigned GET URLs for them.
//!
//! # Architecture
//!
//! ```text
//! MediaService (list_media / get_media)
//!    |-- normalize_prefix
//!    |-- FilterPolicy::admits
//!    v
//! ObjectStore (S3ObjectStore | InMemoryObjectStore)
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod ops;
pub mod prefix;
pub mod store;

pub use config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use filter::FilterPolicy;
pub use ops::{GET_URL_TTL, LIST_URL_TTL, MediaService};
pub use store::{InMemoryObjectStore, ObjectStore, S3ObjectStore, StoreError};
