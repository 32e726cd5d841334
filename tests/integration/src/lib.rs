//! Integration tests for the AKSK server stack.
//!
//! Each test starts an [`AkskHttpService`] on an ephemeral local port and
//! talks to it over real HTTP with `reqwest`, signing requests with
//! [`Signer`].
//!
//! Run them with:
//! ```text
//! cargo test -p aksk-integration
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Once};

use aksk_auth::{AuthConfig, Credential, Signer, StaticSecretStore, VerifiedRequest, Verifier};
use aksk_http::{
    AkskHandler, AkskHttpConfig, AkskHttpService, RequestBody, json_response, message_response,
};
use bytes::Bytes;
use http_body_util::Full;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;

/// Access key accepted by [`start_server`].
pub const ACCESS_KEY: &str = "202cb962ac59075b964b07152d234b70";
/// Secret key paired with [`ACCESS_KEY`].
pub const SECRET_KEY: &str = "250cf8b51c773f3f8dc8b4be867a9a02";

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Echoes the authenticated access key and the body it received.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl AkskHandler for EchoHandler {
    fn handle(
        &self,
        req: http::Request<RequestBody>,
        auth: VerifiedRequest,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>> {
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let buffered = body.is_buffered();
            let Ok(body) = body.into_bytes().await else {
                return message_response(http::StatusCode::BAD_REQUEST, "unreadable body");
            };
            let json = serde_json::to_vec(&serde_json::json!({
                "accessKey": auth.access_key,
                "path": parts.uri.path(),
                "body": String::from_utf8_lossy(&body),
                "buffered": buffered,
            }))
            .expect("echo JSON serializes");
            json_response(json)
        })
    }
}

/// Start a server accepting [`ACCESS_KEY`]/[`SECRET_KEY`] with default
/// settings.
pub async fn start_server() -> anyhow::Result<SocketAddr> {
    start_server_with(AuthConfig::new(), false).await
}

/// Start a server with custom auth settings, optionally skipping the body
/// digest check.
///
/// The server runs on a background task for the rest of the test.
pub async fn start_server_with(
    auth_config: AuthConfig,
    skip_body: bool,
) -> anyhow::Result<SocketAddr> {
    init_tracing();

    let store: StaticSecretStore = [Credential::new(ACCESS_KEY, SECRET_KEY)]
        .into_iter()
        .collect();
    let verifier = Verifier::new(&auth_config, Arc::new(store)).with_skip_body(skip_body);
    let service =
        AkskHttpService::new(Arc::new(EchoHandler), verifier, AkskHttpConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let http = HttpConnBuilder::new(TokioExecutor::new());
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                continue;
            };
            let conn = http
                .serve_connection(TokioIo::new(stream), service.clone())
                .into_owned();
            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    tracing::debug!(error = %e, "test connection closed with error");
                }
            });
        }
    });

    Ok(addr)
}

/// Signer for [`ACCESS_KEY`]/[`SECRET_KEY`] using the given config.
#[must_use]
pub fn signer(config: &AuthConfig) -> Signer {
    Signer::new(config, ACCESS_KEY, SECRET_KEY).expect("test credentials are non-empty")
}

/// Build the URL of `path` on a server started by [`start_server`].
#[must_use]
pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

#[cfg(test)]
mod test_accept;
#[cfg(test)]
mod test_reject;
