//! medialink Lambda function.
//!
//! Receives API Gateway REST proxy events, serves `GET /media` and
//! `GET /media/{key}` against the configured bucket, and returns proxy
//! responses. Every event gets a response; failures are rendered as JSON
//! error bodies rather than surfaced as invocation errors.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TARGET_BUCKET_NAME` | `philips-glacier` | Bucket to list and sign |
//! | `MEDIALINK_FILTER_POLICY` | `exclude-glacier` | `exclude-glacier` or `standard-only` |
//! | `MEDIALINK_VERIFY_EXISTENCE` | `false` | HEAD-check listed objects before signing |
//! | `MEDIALINK_SIGN_CONCURRENCY` | *(unbounded)* | Cap on concurrent signing |
//! | `MEDIALINK_S3_ENDPOINT` | *(unset)* | Custom S3 endpoint |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::sync::Arc;

use anyhow::{Context, Result};
use lambda_runtime::{LambdaEvent, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medialink_core::{MediaConfig, MediaError, MediaService, ObjectStore, S3ObjectStore};
use medialink_http::response::error_to_response;
use medialink_http::{ApiGatewayRequest, ApiGatewayResponse, MediaGateway};

/// Initialize JSON logging for CloudWatch.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .init();

    Ok(())
}

/// Decode a raw event into a request envelope.
fn decode_event(payload: serde_json::Value) -> Result<ApiGatewayRequest, MediaError> {
    serde_json::from_value(payload).map_err(|e| {
        MediaError::invalid_input("event", format!("not an API gateway proxy event: {e}"))
    })
}

async fn handle_event(
    event: LambdaEvent<serde_json::Value>,
    gateway: &MediaGateway<MediaService>,
) -> Result<ApiGatewayResponse, lambda_runtime::Error> {
    tracing::debug!(request_id = %event.context.request_id, "received event");
    match decode_event(event.payload) {
        Ok(request) => Ok(gateway.handle(request).await),
        Err(err) => {
            tracing::warn!(error = %err, "rejected malformed event");
            Ok(error_to_response(&err))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = MediaConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        bucket = %config.bucket,
        filter_policy = %config.filter_policy,
        verify_existence = config.verify_existence,
        sign_concurrency = ?config.sign_concurrency,
        "starting medialink lambda",
    );

    let store = S3ObjectStore::from_config(&config).await;
    let service = MediaService::new(Arc::new(store) as Arc<dyn ObjectStore>, config);
    let gateway = MediaGateway::new(service);

    lambda_runtime::run(service_fn(|event| handle_event(event, &gateway)))
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("lambda runtime exited")
}
