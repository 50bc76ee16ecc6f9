//! Gateway entry point: envelope in, envelope out.
//!
//! [`MediaGateway::handle`] never fails. Routing and operation errors are
//! logged and rendered as error envelopes, so the runtime always gets a
//! response to hand back.

use std::sync::Arc;

use medialink_core::MediaError;
use tracing::{error, info, warn};

use crate::dispatch::{MediaHandler, dispatch_operation};
use crate::envelope::{ApiGatewayRequest, ApiGatewayResponse};
use crate::response::error_to_response;
use crate::router::MediaRouter;

/// Routes request envelopes to a [`MediaHandler`] and renders the outcome.
#[derive(Debug)]
pub struct MediaGateway<H: MediaHandler> {
    handler: Arc<H>,
    router: MediaRouter,
}

impl<H: MediaHandler> MediaGateway<H> {
    /// Create a gateway over `handler`.
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self::from_shared(Arc::new(handler))
    }

    /// Create a gateway over a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>) -> Self {
        Self {
            handler,
            router: MediaRouter::new(),
        }
    }

    /// Handle one request envelope.
    pub async fn handle(&self, req: ApiGatewayRequest) -> ApiGatewayResponse {
        let op = match self.router.resolve(&req) {
            Ok(op) => op,
            Err(err) => {
                warn!(method = %req.http_method, resource = %req.resource, error = %err, "no route for request");
                return error_to_response(&err);
            }
        };

        info!(operation = %op, path = %req.path, "routed media request");

        match dispatch_operation(self.handler.as_ref(), op, req).await {
            Ok(resp) => resp,
            Err(err) => {
                log_failure(&err);
                error_to_response(&err)
            }
        }
    }
}

impl<H: MediaHandler> Clone for MediaGateway<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router,
        }
    }
}

fn log_failure(err: &MediaError) {
    if err.is_client_error() {
        warn!(status = err.status_code(), error = %err, "media request rejected");
    } else {
        error!(status = err.status_code(), error = %err, "media request failed");
    }
}
