//! Typed operation inputs from request envelopes.
//!
//! Defaults and validation for every parameter are applied here, at the
//! boundary, so the operations only ever see well-formed input.
//!
//! | Operation | Parameter | Source | Default |
//! |-----------|-----------|--------|---------|
//! | list-media | `prefix` | query | `""` |
//! | list-media | `max` / `limit` | query | `50` |
//! | list-media | `fileExtension` | query | `""` |
//! | list-media | `continuationToken` | query | none |
//! | get-media | `key` | path | required |

use medialink_core::config::DEFAULT_MAX_KEYS;
use medialink_core::model::{GetMediaInput, ListMediaInput};
use medialink_core::{MediaError, MediaResult};

use crate::envelope::ApiGatewayRequest;

/// Build a typed input from a request envelope.
pub trait FromEnvelope: Sized {
    /// Extract and validate the input.
    fn from_envelope(req: &ApiGatewayRequest) -> MediaResult<Self>;
}

impl FromEnvelope for ListMediaInput {
    fn from_envelope(req: &ApiGatewayRequest) -> MediaResult<Self> {
        let max_keys = match (req.query("max"), req.query("limit")) {
            (Some(raw), _) => parse_max_keys("max", raw)?,
            (None, Some(raw)) => parse_max_keys("limit", raw)?,
            (None, None) => DEFAULT_MAX_KEYS,
        };

        Ok(Self {
            prefix: req.query("prefix").unwrap_or_default().to_owned(),
            max_keys,
            file_extension: req.query("fileExtension").unwrap_or_default().to_owned(),
            continuation_token: req
                .query("continuationToken")
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned),
        })
    }
}

impl FromEnvelope for GetMediaInput {
    fn from_envelope(req: &ApiGatewayRequest) -> MediaResult<Self> {
        match req.path_param("key") {
            Some(key) if !key.trim().is_empty() => Ok(Self {
                key: key.to_owned(),
            }),
            _ => Err(MediaError::invalid_input(
                "key",
                "missing required path parameter",
            )),
        }
    }
}

/// Parse a page size. Anything but a positive integer is rejected.
fn parse_max_keys(param: &'static str, raw: &str) -> MediaResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MediaError::invalid_input(
            param,
            format!("expected a positive integer, got '{raw}'"),
        )),
    }
}
