//! Response envelopes for successes and failures.
//!
//! Every response carries a JSON body and the same three headers:
//! `Content-Type: application/json`, `Access-Control-Allow-Origin: *`, and
//! `Access-Control-Allow-Methods: GET, OPTIONS`.
//!
//! Success bodies are the operation result with a `"message": "success"`
//! field alongside it. Error bodies are `{"error": "<message>"}`.

use std::collections::BTreeMap;

use medialink_core::MediaError;
use serde::Serialize;

use crate::envelope::ApiGatewayResponse;

/// Value of `Access-Control-Allow-Origin`.
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Methods`.
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";

/// Value of `Content-Type`.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Serialize)]
struct SuccessBody<'a, T> {
    message: &'static str,
    #[serde(flatten)]
    result: &'a T,
}

/// Headers present on every response.
#[must_use]
pub fn common_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned()),
        (
            "Access-Control-Allow-Origin".to_owned(),
            CORS_ALLOW_ORIGIN.to_owned(),
        ),
        (
            "Access-Control-Allow-Methods".to_owned(),
            CORS_ALLOW_METHODS.to_owned(),
        ),
    ])
}

/// Build a response with the common headers around a JSON body.
#[must_use]
pub fn json_response(status_code: u16, body: String) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: common_headers(),
        body,
        is_base64_encoded: false,
    }
}

/// Build a `200` response from an operation result.
///
/// `result` must serialize to a JSON object; its fields sit next to
/// `"message": "success"` in the body.
#[must_use]
pub fn success_response<T: Serialize>(result: &T) -> ApiGatewayResponse {
    let body = SuccessBody {
        message: "success",
        result,
    };
    match serde_json::to_string(&body) {
        Ok(json) => json_response(200, json),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response body");
            json_response(500, error_body("failed to serialize response"))
        }
    }
}

/// Build an error response with the status mapped from the error kind.
#[must_use]
pub fn error_to_response(err: &MediaError) -> ApiGatewayResponse {
    json_response(err.status_code(), error_body(&err.to_string()))
}

fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
