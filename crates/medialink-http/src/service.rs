//! Local HTTP service implementing hyper's `Service` trait.
//!
//! [`MediaHttpService`] stands in for the API gateway during development. It
//! turns a plain HTTP request into the same [`ApiGatewayRequest`] the gateway
//! would deliver, runs it through [`MediaGateway`], and writes the resulting
//! envelope back as an HTTP response. It also handles:
//!
//! 1. Health check interception (`GET /health`, `GET /_health`)
//! 2. CORS preflight requests (`OPTIONS`)
//! 3. Common response headers (`x-request-id`, `Server`)

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::Service;
use percent_encoding::percent_decode_str;
use tracing::debug;
use uuid::Uuid;

use crate::dispatch::MediaHandler;
use crate::envelope::{ApiGatewayRequest, ApiGatewayResponse};
use crate::gateway::MediaGateway;
use crate::response::{CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
use crate::router::{GET_PROXY_RESOURCE, GET_RESOURCE, LIST_RESOURCE};

/// Body of every response the local service writes. Envelopes carry their
/// body as a complete string, so nothing is streamed.
pub type ResponseBody = Full<Bytes>;

/// hyper service that emulates the API gateway in front of a [`MediaHandler`].
#[derive(Debug)]
pub struct MediaHttpService<H: MediaHandler> {
    gateway: MediaGateway<H>,
}

impl<H: MediaHandler> MediaHttpService<H> {
    /// Create a service over `handler`.
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self {
            gateway: MediaGateway::new(handler),
        }
    }
}

impl<H: MediaHandler> Clone for MediaHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<H: MediaHandler> Service<http::Request<Incoming>> for MediaHttpService<H> {
    type Response = http::Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let gateway = self.gateway.clone();
        let (parts, _body) = req.into_parts();

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(&parts.method, &parts.uri, &gateway, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through health check, preflight, and the gateway.
async fn process_request<H: MediaHandler>(
    method: &http::Method,
    uri: &http::Uri,
    gateway: &MediaGateway<H>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    debug!(%method, %uri, request_id, "processing media request");

    if is_health_check(method, uri.path()) {
        return health_check_response();
    }

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let envelope = envelope_from_uri(method, uri);
    into_http_response(gateway.handle(envelope).await)
}

/// Build the envelope the API gateway would deliver for `method` and `uri`.
///
/// `/media` maps to the listing resource. `/media/<key>` maps to the
/// single-object resource with the percent-decoded key as the `key` path
/// parameter; keys containing `/` use the greedy form. Any other path is
/// passed through as the resource and fails to route.
#[must_use]
pub fn envelope_from_uri(method: &http::Method, uri: &http::Uri) -> ApiGatewayRequest {
    let path = uri.path();
    let query_string_parameters: HashMap<String, String> = uri
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let (resource, path_parameters) = match path.strip_prefix("/media/") {
        Some(rest) if !rest.is_empty() => {
            let key = percent_decode_str(rest).decode_utf8_lossy().into_owned();
            let resource = if key.contains('/') {
                GET_PROXY_RESOURCE
            } else {
                GET_RESOURCE
            };
            (
                resource.to_owned(),
                HashMap::from([("key".to_owned(), key)]),
            )
        }
        None if path == LIST_RESOURCE => (LIST_RESOURCE.to_owned(), HashMap::new()),
        _ => (path.to_owned(), HashMap::new()),
    };

    ApiGatewayRequest {
        http_method: method.as_str().to_owned(),
        resource,
        path: path.to_owned(),
        query_string_parameters,
        path_parameters,
    }
}

/// Write a response envelope as an HTTP response.
///
/// Headers that are not valid HTTP are dropped.
#[must_use]
pub fn into_http_response(envelope: ApiGatewayResponse) -> http::Response<ResponseBody> {
    let mut response = http::Response::new(Full::from(envelope.body));
    *response.status_mut() = http::StatusCode::from_u16(envelope.status_code)
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    response
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

fn health_check_response() -> http::Response<ResponseBody> {
    let mut response =
        http::Response::new(Full::from(r#"{"status":"running","service":"medialink"}"#));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn cors_preflight_response() -> http::Response<ResponseBody> {
    let mut response = http::Response::new(Full::default());
    let headers = response.headers_mut();
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

fn add_common_headers(
    mut response: http::Response<ResponseBody>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }
    headers.insert("Server", HeaderValue::from_static("medialink"));

    response
}
