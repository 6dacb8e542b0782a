//! HTTP response building
//!
//! Builders never fail: a builder error is logged and a bare response with the
//! same body is returned instead.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

/// Build a response with only a status line and an empty body
pub fn build_status_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a plain-text error response, e.g. `404 page not found`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = format!("{message}\n");
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body.clone())))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 301 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::MOVED_PERMANENTLY, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
///
/// Representation headers are dropped from `headers`; validators stay.
pub fn build_304_response(mut headers: HeaderMap) -> Response<Full<Bytes>> {
    headers.remove(CONTENT_TYPE);
    headers.remove(CONTENT_LENGTH);
    if headers.contains_key(hyper::header::ETAG) {
        headers.remove(hyper::header::LAST_MODIFIED);
    }
    build_content_response(StatusCode::NOT_MODIFIED, headers, Bytes::new(), false)
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: usize) -> Response<Full<Bytes>> {
    let mut response = build_error_response(
        StatusCode::RANGE_NOT_SATISFIABLE,
        "416 range not satisfiable",
    );
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{total_size}")) {
        response.headers_mut().insert(CONTENT_RANGE, value);
    }
    response
}

/// Build a response from prepared headers.
///
/// `Content-Length` is always the length of `data`; the body is dropped for HEAD.
pub fn build_content_response(
    status: StatusCode,
    headers: HeaderMap,
    data: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if status != StatusCode::NOT_MODIFIED {
        response
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(content_length));
    }
    response
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_404_response() {
        let response = build_404_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(response).await, "404 page not found\n");
    }

    #[tokio::test]
    async fn test_content_response_head() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/css"));

        let response =
            build_content_response(StatusCode::OK, headers, Bytes::from("body{}"), true);
        assert_eq!(response.headers()[CONTENT_LENGTH], "6");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/css");
        assert!(body_bytes(response).await.is_empty());
    }

    #[test]
    fn test_304_strips_representation_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/css"));
        headers.insert(hyper::header::ETAG, HeaderValue::from_static("\"a\""));
        headers.insert(
            hyper::header::LAST_MODIFIED,
            HeaderValue::from_static("Wed, 01 May 2024 12:00:00 GMT"),
        );

        let response = build_304_response(headers);
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert!(response.headers().get(hyper::header::LAST_MODIFIED).is_none());
        assert_eq!(response.headers()[hyper::header::ETAG], "\"a\"");
    }

    #[test]
    fn test_416_response() {
        let response = build_416_response(100);
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(response.headers()[CONTENT_RANGE], "bytes */100");
    }
}
