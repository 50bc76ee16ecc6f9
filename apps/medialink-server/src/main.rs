//! medialink local server.
//!
//! Serves the medialink routes over plain HTTP, building the same proxy
//! envelopes API Gateway would, so the function can be exercised locally
//! against real S3 or an emulator.
//!
//! # Usage
//!
//! ```text
//! MEDIALINK_S3_ENDPOINT=http://localhost:4566 TARGET_BUCKET_NAME=media medialink-server
//! curl 'http://localhost:3000/media?prefix=photos&max=10'
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:3000` | Bind address |
//! | `TARGET_BUCKET_NAME` | `philips-glacier` | Bucket to list and sign |
//! | `MEDIALINK_FILTER_POLICY` | `exclude-glacier` | `exclude-glacier` or `standard-only` |
//! | `MEDIALINK_VERIFY_EXISTENCE` | `false` | HEAD-check listed objects before signing |
//! | `MEDIALINK_SIGN_CONCURRENCY` | *(unbounded)* | Cap on concurrent signing |
//! | `MEDIALINK_S3_ENDPOINT` | *(unset)* | Custom S3 endpoint |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use medialink_core::{MediaConfig, MediaService, ObjectStore, S3ObjectStore};
use medialink_http::{MediaHandler, MediaHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on a `--health-check` round trip.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Initialize the tracing subscriber.
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
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Accept connections until `shutdown` resolves, then drain in-flight requests.
async fn serve_until<H, F>(
    listener: TcpListener,
    service: MediaHttpService<H>,
    shutdown: F,
) -> Result<()>
where
    H: MediaHandler,
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    let builder = HttpConnBuilder::new(TokioExecutor::new());
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            biased;
            () = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            },
        };

        debug!(%peer_addr, "accepted connection");
        let conn = graceful.watch(
            builder
                .serve_connection(TokioIo::new(stream), service.clone())
                .into_owned(),
        );
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                warn!(%peer_addr, error = %e, "connection closed with error");
            }
        });
    }

    info!("draining open connections");
    graceful.shutdown().await;
    info!("server stopped");
    Ok(())
}

/// Resolve once the process receives Ctrl-C.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}

/// Check that a server at `addr` answers `GET /health` with a running status.
async fn run_health_check(addr: &str) -> Result<()> {
    tokio::time::timeout(HEALTH_CHECK_TIMEOUT, fetch_health(addr))
        .await
        .with_context(|| format!("health check against {addr} timed out"))?
}

async fn fetch_health(addr: &str) -> Result<()> {
    let mut stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;
    let raw = String::from_utf8_lossy(&raw);

    let status = raw
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .context("empty health response")?;
    anyhow::ensure!(status == "200", "health endpoint answered {status}");

    let (_, body) = raw
        .split_once("\r\n\r\n")
        .context("health response has no body")?;
    let body: serde_json::Value =
        serde_json::from_str(body.trim()).context("health body is not JSON")?;
    anyhow::ensure!(body["status"] == "running", "server reports {}", body["status"]);

    Ok(())
}

/// Address to reach a server bound to `gateway_listen` from the same host.
fn health_check_addr(gateway_listen: &str) -> String {
    gateway_listen.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = MediaConfig::from_env();

    // Docker HEALTHCHECK entry point.
    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&health_check_addr(&config.gateway_listen))
            .await
            .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        bucket = %config.bucket,
        filter_policy = %config.filter_policy,
        s3_endpoint = ?config.s3_endpoint,
        version = VERSION,
        "starting medialink server",
    );

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let store = S3ObjectStore::from_config(&config).await;
    let service = MediaHttpService::new(MediaService::new(
        Arc::new(store) as Arc<dyn ObjectStore>,
        config,
    ));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve_until(listener, service, ctrl_c()).await
}

#[cfg(test)]
mod tests {
    use medialink_core::InMemoryObjectStore;
    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn test_should_use_loopback_for_wildcard_bind() {
        assert_eq!(health_check_addr("0.0.0.0:3000"), "127.0.0.1:3000");
        assert_eq!(health_check_addr("10.0.0.5:8080"), "10.0.0.5:8080");
    }

    #[tokio::test]
    async fn test_should_fail_health_check_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        drop(listener);

        assert!(run_health_check(&addr).await.is_err());
    }

    #[tokio::test]
    async fn test_should_pass_health_check_and_stop_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        let store = Arc::new(InMemoryObjectStore::new("bucket"));
        let service = MediaHttpService::new(MediaService::new(
            Arc::clone(&store) as Arc<dyn ObjectStore>,
            MediaConfig::default(),
        ));

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(listener, service, async {
            rx.await.ok();
        }));

        run_health_check(&addr).await.expect("healthy");
        assert_eq!(store.total_calls(), 0);

        tx.send(()).expect("server still running");
        server.await.expect("join").expect("clean shutdown");
    }
}
