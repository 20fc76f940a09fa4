//! HTTP server and graceful shutdown.
//!
//! The server is the boundary between hyper and the framework. For each
//! request it:
//!
//! 1. Builds a [`Request`] snapshot (headers, query, decoded body, peer).
//!    Bodies over the configured cap end the request with `413`.
//! 2. Negotiates the [`Surface`] once.
//! 3. Calls [`Router::resolve`].
//! 4. Maps routing errors to status codes and a content-negotiated body.
//!
//! On SIGTERM or Ctrl-C it stops accepting, drains in-flight connections
//! and returns from [`Server::serve`].

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::controller::web;
use crate::error::Error;
use crate::method::Method;
use crate::request::{Request, parse_query};
use crate::response::Response;
use crate::router::Router;
use crate::surface::Surface;

/// Default cap on a buffered request body: 8 MiB.
const MAX_BODY: usize = 8 * 1024 * 1024;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    max_body: usize,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string. Use
    /// [`try_bind`](Server::try_bind) for addresses read at runtime.
    pub fn bind(addr: &str) -> Self {
        Self::try_bind(addr).unwrap_or_else(|e| panic!("invalid socket address `{addr}`: {e}"))
    }

    pub fn try_bind(addr: &str) -> Result<Self, std::net::AddrParseError> {
        Ok(Self { addr: addr.parse()?, max_body: MAX_BODY })
    }

    /// Caps how many body bytes are buffered per request (default 8 MiB).
    /// Larger bodies are answered with `413 Payload Too Large` before routing.
    pub fn max_body(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let router = Arc::new(router);
        let max_body = self.max_body;

        info!(addr = %self.addr, routes = router.routes().len(), max_body, "senda listening");

        let mut tasks = tokio::task::JoinSet::new();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting immediately.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req, remote_addr, max_body).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("senda stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
    max_body: usize,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let accepts_json = req
        .headers()
        .get_all(http::header::ACCEPT)
        .iter()
        .any(|v| v.to_str().is_ok_and(|v| v.contains("application/json")));

    let response = match snapshot(req, remote_addr, max_body).await {
        Ok(request) => {
            let surface = Surface::negotiate(&request);
            let wants_json = request.wants_json();
            let (method, path) = (request.method(), request.path().to_owned());
            match router.resolve(request, surface).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(%method, %path, "{e}");
                    error_response(&e, wants_json)
                }
            }
        }
        Err(e) => {
            warn!(peer = %remote_addr, "{e}");
            error_response(&e, accepts_json)
        }
    };

    Ok(response.into_http())
}

/// Reads a hyper request into a [`Request`], buffering at most `max_body`
/// bytes of body.
async fn snapshot<B>(
    req: hyper::Request<B>,
    remote_addr: SocketAddr,
    max_body: usize,
) -> Result<Request, Error>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let method = Method::try_from(&parts.method)?;
    let target = parts.uri.path_and_query().map_or("/", |pq| pq.as_str()).to_owned();

    let mut builder = Request::builder(method, target).remote_addr(remote_addr.ip().to_string());
    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(value) => builder = builder.header(name.as_str(), value),
            Err(_) => warn!(header = %name, "skipping non-ASCII header"),
        }
    }

    let body = match Limited::new(body, max_body).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(Error::PayloadTooLarge { limit: max_body });
        }
        Err(e) => return Err(std::io::Error::other(e).into()),
    };
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    Ok(builder.form_map(decode_body(content_type, &body)).build())
}

/// Decodes form and JSON-object bodies. Anything else yields an empty map.
fn decode_body(content_type: &str, body: &[u8]) -> Map<String, Value> {
    if body.is_empty() {
        return Map::new();
    }
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        parse_query(&String::from_utf8_lossy(body))
    } else if mime.eq_ignore_ascii_case("application/json") {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                warn!("ignoring malformed JSON body: {e}");
                Map::new()
            }
        }
    } else {
        Map::new()
    }
}

/// Renders a failed resolution. The status comes from the error kind; the
/// body is JSON for clients that asked for it, HTML otherwise.
fn error_response(err: &Error, wants_json: bool) -> Response {
    let status = match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        Error::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
        Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let reason = status.canonical_reason().unwrap_or("Error");

    if wants_json {
        return Response::builder().status(status).json(&json!({
            "error": reason,
            "message": err.to_string(),
            "status": status.as_u16(),
        }));
    }

    let page = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n\
         <head><meta charset=\"UTF-8\"><title>{code} {reason}</title></head>\n\
         <body>\n<h1>{code}</h1>\n<h2>{reason}</h2>\n<p>{message}</p>\n\
         <a href=\"/\">Back to home</a>\n</body>\n</html>\n",
        code = status.as_u16(),
        message = web::escape(&err.to_string()),
    );
    web::html(page, status)
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM (Unix) or Ctrl-C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
