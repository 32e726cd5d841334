//! AKSK Server - reference HTTP server protected by AKSK authentication.
//!
//! Every request must carry valid `x-auth-*` headers signed with one of the
//! configured credentials. Accepted requests are answered by an echo handler;
//! rejected ones get `401` with a JSON `{"message": ...}` body.
//!
//! # Usage
//!
//! ```text
//! AKSK_CREDENTIALS=ak:sk GATEWAY_LISTEN=0.0.0.0:8080 aksk-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `AKSK_CREDENTIALS` | *(empty)* | Comma-separated `ak:sk` pairs |
//! | `ACCESS_KEY` / `SECRET_KEY` | *(unset)* | One more credential |
//! | `AKSK_SKIP_BODY` | `false` | Skip the body digest check |
//! | `AKSK_HASH` | `sha256` | `sha256`, `sha512`, `sha1` or `md5` |
//! | `AKSK_ENCODING` | `hex` | `hex` or `base64` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use aksk_auth::{AuthConfig, EncodingKind, HashKind, StaticSecretStore, TracingLogger, Verifier};
use aksk_http::{AkskHttpConfig, AkskHttpService};
use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::handler::EchoHandler;

/// Server version reported at start-up.
const VERSION: &str = env!("CARGO_PKG_VERSION");

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

/// Build the [`AuthConfig`] selected by the server configuration.
fn build_auth_config(config: &ServerConfig) -> Result<AuthConfig> {
    let hash: HashKind = config.hash.parse()?;
    let encoding: EncodingKind = config.encoding.parse()?;

    let auth_config = AuthConfig::new();
    auth_config.set_hash(Some(hash.algorithm()))?;
    auth_config.set_encoding(Some(encoding.encoding()))?;
    auth_config.set_logger(Some(Arc::new(TracingLogger)))?;
    Ok(auth_config)
}

/// Build the authenticated service from the server configuration.
fn build_service(config: &ServerConfig) -> Result<AkskHttpService<EchoHandler>> {
    let auth_config = build_auth_config(config)?;

    if config.credentials.is_empty() {
        warn!("no credentials configured, every request will be rejected");
    }
    let store: StaticSecretStore = config.credentials.iter().cloned().collect();
    info!(access_keys = store.len(), "configured secret store");

    let verifier = Verifier::new(&auth_config, Arc::new(store)).with_skip_body(config.skip_body);
    Ok(AkskHttpService::new(
        Arc::new(EchoHandler),
        verifier,
        AkskHttpConfig::default(),
    ))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: AkskHttpService<EchoHandler>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        skip_body = config.skip_body,
        hash = %config.hash,
        encoding = %config.encoding,
        version = VERSION,
        "starting AKSK server",
    );

    let service = build_service(&config)?;

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
