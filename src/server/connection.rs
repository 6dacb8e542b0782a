// Connection handling module
// Serves one TCP connection and routes each request through the SPA handler

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;

use super::ServerState;
use crate::error::StaticError;
use crate::fs::FileSystem;
use crate::handler::Outcome;
use crate::http::response;
use crate::logger;

/// Run a request through the handler chain.
///
/// The SPA handler goes first; requests it passes on reach the fallback,
/// which rejects them with 405. Render failures are returned as errors.
pub async fn route<F, B>(
    state: &ServerState<F>,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, StaticError>
where
    F: FileSystem,
{
    match state.handler.handle(req).await? {
        Outcome::Respond(response) => Ok(response),
        Outcome::Next(req) => Ok(method_not_allowed(&req)),
    }
}

fn method_not_allowed<B>(req: &Request<B>) -> Response<Full<Bytes>> {
    logger::log_debug(&format!("No handler for {} {}", req.method(), req.uri().path()));
    let mut response =
        response::build_error_response(StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

/// Handle a single connection in a spawned task.
///
/// A render failure surfaces as a service error, which makes hyper drop the
/// connection without writing a response.
pub fn handle_connection<F>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<ServerState<F>>,
) where
    F: FileSystem + 'static,
{
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = state.timeout;

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move {
                    let started = Instant::now();
                    let method = req.method().to_string();
                    let path = req.uri().path().to_string();

                    let result = route(&state, req).await;
                    if state.access_log {
                        if let Ok(response) = &result {
                            logger::log_access(
                                &peer_addr,
                                &method,
                                &path,
                                response.status().as_u16(),
                                started.elapsed().as_micros(),
                            );
                        }
                    }
                    result
                }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::handler::{StaticHandler, StaticOptions};
    use hyper::Method;
    use std::time::Duration;

    async fn create_state() -> ServerState<MemoryFs> {
        let root = MemoryFs::new()
            .with_file("index.html", "<html>{{.Title}}</html>")
            .with_file("app.js", "console.log(1)");
        let handler = StaticHandler::new(root, StaticOptions::new()).await.unwrap();
        ServerState {
            handler,
            access_log: false,
            keep_alive: true,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_route_serves_and_falls_back() {
        let state = create_state().await;

        let req = Request::get("/app.js").body(()).unwrap();
        assert_eq!(route(&state, req).await.unwrap().status(), StatusCode::OK);

        let req = Request::get("/missing.css").body(()).unwrap();
        assert_eq!(
            route(&state, req).await.unwrap().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_route_passes_other_methods_to_fallback() {
        let state = create_state().await;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/login")
            .body(())
            .unwrap();
        let response = route(&state, req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }
}
