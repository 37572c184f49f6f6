//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mirror_proxy::comparison::Sampler;
use mirror_proxy::config::MirrorConfig;
use mirror_proxy::http::HttpServer;
use mirror_proxy::lifecycle::Shutdown;
use mirror_proxy::observability::LogSink;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What a mock backend answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock backend.
pub struct Backend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Backend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct BackendState {
    reply: Reply,
    requests: Arc<Mutex<Vec<Captured>>>,
}

async fn record_and_reply(State(state): State<BackendState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    state.requests.lock().unwrap().push(Captured {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body,
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let mut response = (
        StatusCode::from_u16(state.reply.status).unwrap(),
        state.reply.body.clone(),
    )
        .into_response();
    for (name, value) in &state.reply.headers {
        response
            .headers_mut()
            .insert(*name, value.parse().unwrap());
    }
    response
}

/// Start a mock backend that records every request and answers with `reply`.
pub async fn start_backend(reply: Reply) -> Backend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new().fallback(record_and_reply).with_state(BackendState {
        reply,
        requests: requests.clone(),
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Backend { addr, requests }
}

/// Start a raw backend that answers every request with a chunked body.
pub async fn start_chunked_backend(chunks: &'static [&'static str]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let mut response = String::from(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
                );
                for part in chunks {
                    response.push_str(&format!("{:x}\r\n{}\r\n", part.len(), part));
                }
                response.push_str("0\r\n\r\n");

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at the two upstreams.
pub fn config_for(primary: &str, secondary: &str) -> MirrorConfig {
    let mut config = MirrorConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.primary = primary.to_string();
    config.upstreams.secondary = secondary.to_string();
    config
}

/// A proxy running on an ephemeral port.
pub struct Proxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Proxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Proxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy with an explicit sampler and sink.
pub async fn start_proxy(
    config: MirrorConfig,
    sampler: Arc<dyn Sampler>,
    sink: Arc<dyn LogSink>,
) -> Proxy {
    let server = HttpServer::with_components(config, sampler, sink).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Proxy { addr, shutdown }
}

/// Client that neither follows redirects nor uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
