//! API gateway proxy envelopes.
//!
//! [`ApiGatewayRequest`] is the subset of the REST API proxy integration event
//! medialink reads; unknown fields are ignored. [`ApiGatewayResponse`] is the
//! proxy integration result the gateway turns back into an HTTP response.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

/// Inbound request as delivered by the API gateway.
///
/// Every field tolerates being absent or `null`, so events of an unexpected
/// shape still reach the router and get an error envelope back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    /// HTTP method, e.g. `GET`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    /// Route template that matched, e.g. `/media/{key}`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: String,
    /// Concrete request path, e.g. `/media/abc.jpg`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    /// Query string parameters. A `null` map is empty; `null` values are dropped.
    #[serde(default, deserialize_with = "params_without_nulls")]
    pub query_string_parameters: HashMap<String, String>,
    /// Path parameters. A `null` map is empty; `null` values are dropped.
    #[serde(default, deserialize_with = "params_without_nulls")]
    pub path_parameters: HashMap<String, String>,
}

impl ApiGatewayRequest {
    /// Create a `GET` request for a route template.
    #[must_use]
    pub fn get(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            http_method: "GET".to_owned(),
            path: resource.clone(),
            resource,
            ..Self::default()
        }
    }

    /// Add a query string parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .insert(name.into(), value.into());
        self
    }

    /// Add a path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// Look up a query string parameter.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// Look up a path parameter.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }
}

/// Outbound response handed back to the API gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON body.
    pub body: String,
    /// Always `false`: bodies are JSON text.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ApiGatewayResponse {
    /// Look up a response header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn params_without_nulls<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Option<String>> = null_as_default(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect())
}
