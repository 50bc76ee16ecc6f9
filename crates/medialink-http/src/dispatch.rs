//! Operation dispatch: hands a routed request to the business logic.
//!
//! [`MediaHandler`] is the boundary between the gateway layer and the media
//! operations. [`MediaService`] implements it by parsing the typed input,
//! running the operation, and wrapping the result in a success envelope.

use std::future::Future;
use std::pin::Pin;

use medialink_core::MediaResult;
use medialink_core::MediaService;
use medialink_core::model::{GetMediaInput, ListMediaInput};

use crate::envelope::{ApiGatewayRequest, ApiGatewayResponse};
use crate::request::FromEnvelope;
use crate::response::success_response;
use crate::router::MediaOperation;

/// Future returned by [`MediaHandler::handle_operation`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = MediaResult<ApiGatewayResponse>> + Send>>;

/// Business logic behind the routes.
///
/// Boxed futures keep the trait usable behind `Arc<dyn MediaHandler>`.
pub trait MediaHandler: Send + Sync + 'static {
    /// Handle a routed operation and produce a success response.
    ///
    /// Failures are returned as errors and rendered by the caller.
    fn handle_operation(&self, op: MediaOperation, req: ApiGatewayRequest) -> HandlerFuture;
}

impl MediaHandler for MediaService {
    fn handle_operation(&self, op: MediaOperation, req: ApiGatewayRequest) -> HandlerFuture {
        let service = self.clone();
        Box::pin(async move {
            match op {
                MediaOperation::ListMedia => {
                    let input = ListMediaInput::from_envelope(&req)?;
                    let output = service.list_media(input).await?;
                    Ok(success_response(&output))
                }
                MediaOperation::GetMedia => {
                    let input = GetMediaInput::from_envelope(&req)?;
                    let output = service.get_media(input).await?;
                    Ok(success_response(&output))
                }
            }
        })
    }
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: MediaHandler + ?Sized>(
    handler: &H,
    op: MediaOperation,
    req: ApiGatewayRequest,
) -> MediaResult<ApiGatewayResponse> {
    tracing::debug!(operation = %op, path = %req.path, "dispatching media operation");
    handler.handle_operation(op, req).await
}
