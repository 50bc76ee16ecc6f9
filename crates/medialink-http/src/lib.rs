//! API gateway layer for medialink.
//!
//! - **Envelope** ([`envelope`]): proxy integration request and response types.
//! - **Request** ([`request`]): typed, validated operation inputs.
//! - **Routing** ([`router`]): `(method, resource)` to [`MediaOperation`].
//! - **Dispatch** ([`dispatch`]): the [`MediaHandler`] boundary, implemented
//!   for `MediaService`.
//! - **Response** ([`response`]): success and error envelopes with CORS headers.
//! - **Gateway** ([`gateway`]): [`MediaGateway`], the infallible entry point
//!   shared by the Lambda function and the local server.
//! - **Service** ([`service`]): [`MediaHttpService`], a hyper service that
//!   emulates the API gateway locally.
//!
//! # Architecture
//!
//! ```text
//! Lambda event / HTTP request
//!   -> ApiGatewayRequest
//!     -> MediaRouter (resource template -> operation)
//!     -> MediaHandler (typed input -> list_media / get_media)
//!     -> success_response / error_to_response
//!   <- ApiGatewayResponse
//! ```

pub mod dispatch;
pub mod envelope;
pub mod gateway;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use dispatch::{MediaHandler, dispatch_operation};
pub use envelope::{ApiGatewayRequest, ApiGatewayResponse};
pub use gateway::MediaGateway;
pub use request::FromEnvelope;
pub use router::{MediaOperation, MediaRouter};
pub use service::{MediaHttpService, ResponseBody};
