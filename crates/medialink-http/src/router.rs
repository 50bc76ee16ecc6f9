//! Request routing: `(method, resource)` to operation.
//!
//! The route table is fixed:
//!
//! | Method | Resource | Operation |
//! |--------|----------|-----------|
//! | `GET` | `/media` | [`MediaOperation::ListMedia`] |
//! | `GET` | `/media/{key}` | [`MediaOperation::GetMedia`] |
//! | `GET` | `/media/{key+}` | [`MediaOperation::GetMedia`] |
//!
//! The greedy `{key+}` form lets keys that contain `/` reach get-media.

use std::fmt;

use medialink_core::{MediaError, MediaResult};

use crate::envelope::ApiGatewayRequest;

/// Resource template of the listing route.
pub const LIST_RESOURCE: &str = "/media";

/// Resource template of the single-object route.
pub const GET_RESOURCE: &str = "/media/{key}";

/// Greedy resource template of the single-object route.
pub const GET_PROXY_RESOURCE: &str = "/media/{key+}";

/// Operations medialink exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaOperation {
    /// List a prefix and sign every surfaced object.
    ListMedia,
    /// Sign a single object.
    GetMedia,
}

impl MediaOperation {
    /// Operation name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListMedia => "ListMedia",
            Self::GetMedia => "GetMedia",
        }
    }
}

impl fmt::Display for MediaOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct Route {
    method: &'static str,
    resource: &'static str,
    operation: MediaOperation,
}

const ROUTES: &[Route] = &[
    Route {
        method: "GET",
        resource: LIST_RESOURCE,
        operation: MediaOperation::ListMedia,
    },
    Route {
        method: "GET",
        resource: GET_RESOURCE,
        operation: MediaOperation::GetMedia,
    },
    Route {
        method: "GET",
        resource: GET_PROXY_RESOURCE,
        operation: MediaOperation::GetMedia,
    },
];

/// Maps request envelopes to operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaRouter;

impl MediaRouter {
    /// Create a router over the fixed route table.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve the operation for a request.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::NotFound`] when no route matches.
    pub fn resolve(&self, req: &ApiGatewayRequest) -> MediaResult<MediaOperation> {
        ROUTES
            .iter()
            .find(|r| r.method.eq_ignore_ascii_case(&req.http_method) && r.resource == req.resource)
            .map(|r| r.operation)
            .ok_or_else(|| {
                MediaError::not_found(format!(
                    "no route for {} {}",
                    req.http_method, req.resource
                ))
            })
    }
}
