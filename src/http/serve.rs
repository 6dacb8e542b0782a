//! Static file serving
//!
//! Serves one named file from a [`FileSystem`] for a request: content type,
//! validators, conditional requests and byte ranges. This is the generic
//! file-server behaviour the SPA handler delegates to; it knows nothing about
//! entry documents or fallbacks.

use crate::fs::{FileSystem, OpenedFile};
use crate::http::range::RangeRequest;
use crate::http::{cache, mime, range, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, CONTENT_RANGE, CONTENT_TYPE, ETAG,
    IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, LAST_MODIFIED, RANGE,
};
use hyper::http::request::Parts;
use hyper::{Method, Response, StatusCode};
use std::io;

const INDEX_PAGE: &str = "index.html";
const INDEX_SUFFIX: &str = "/index.html";

/// Serve `name` from `root` as the response to `req`.
///
/// `preset` holds headers already written for this response. A preset
/// `Content-Type` or `ETag` is kept instead of the computed one.
pub async fn serve_file<F: FileSystem>(
    root: &F,
    req: &Parts,
    name: &str,
    preset: HeaderMap,
) -> Response<Full<Bytes>> {
    if contains_dot_dot(req.uri.path()) {
        return response::build_error_response(StatusCode::BAD_REQUEST, "invalid URL path");
    }

    // `.../index.html` is only ever reachable as its directory
    if req.uri.path().ends_with(INDEX_SUFFIX) {
        return redirect(&with_query(req, "./"), preset);
    }

    let file = match root.open(name).await {
        Ok(file) => file,
        Err(e) => return open_error_response(name, &e),
    };

    if !file.is_dir {
        return serve_content(req, name, file, preset);
    }

    let url_path = req.uri.path();
    if !url_path.ends_with('/') {
        return redirect(&directory_redirect(req), preset);
    }

    let index = if name == "." {
        INDEX_PAGE.to_string()
    } else {
        format!("{}/{INDEX_PAGE}", name.trim_end_matches('/'))
    };
    match root.open(&index).await {
        Ok(file) if !file.is_dir => serve_content(req, &index, file, preset),
        _ => response::build_404_response(),
    }
}

/// Serve an already opened regular file
fn serve_content(
    req: &Parts,
    name: &str,
    file: OpenedFile,
    mut headers: HeaderMap,
) -> Response<Full<Bytes>> {
    let is_head = req.method == Method::HEAD;
    let total_size = file.content.len();

    if !headers.contains_key(CONTENT_TYPE) {
        let content_type = mime::detect_content_type(name, &file.content);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    let etag = match headers.get(ETAG).and_then(|v| v.to_str().ok()) {
        Some(preset) => preset.to_string(),
        None => {
            let etag = cache::generate_etag(&file.content);
            insert_header(&mut headers, ETAG, &etag);
            etag
        }
    };

    if let Some(modified) = &file.modified {
        insert_header(&mut headers, LAST_MODIFIED, &cache::format_http_date(modified));
    }
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if is_not_modified(req, &etag, file.modified.as_ref()) {
        return response::build_304_response(headers);
    }

    let range_header = header_str(req, &RANGE);
    let if_range = header_str(req, &IF_RANGE);
    if let Some(range_header) = range_header {
        if cache::if_range_allows(if_range, &etag, file.modified.as_ref()) {
            match range::parse_range(range_header, total_size) {
                RangeRequest::Partial(byte_range) => {
                    insert_header(
                        &mut headers,
                        CONTENT_RANGE,
                        &byte_range.content_range(total_size),
                    );
                    let part = file.content.slice(byte_range.start..=byte_range.end);
                    return response::build_content_response(
                        StatusCode::PARTIAL_CONTENT,
                        headers,
                        part,
                        is_head,
                    );
                }
                RangeRequest::Unsatisfiable => {
                    return response::build_416_response(total_size);
                }
                RangeRequest::Full => {}
            }
        }
    }

    response::build_content_response(StatusCode::OK, headers, file.content, is_head)
}

/// `If-None-Match` takes precedence; `If-Modified-Since` applies only without it
fn is_not_modified(
    req: &Parts,
    etag: &str,
    modified: Option<&chrono::DateTime<chrono::Utc>>,
) -> bool {
    if req.method != Method::GET && req.method != Method::HEAD {
        return false;
    }
    if let Some(if_none_match) = header_str(req, &IF_NONE_MATCH) {
        return cache::etag_matches_weak(if_none_match, etag);
    }
    match (header_str(req, &IF_MODIFIED_SINCE), modified) {
        (Some(since), Some(modified)) => !cache::is_modified_since(modified, since),
        _ => false,
    }
}

fn open_error_response(name: &str, error: &io::Error) -> Response<Full<Bytes>> {
    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => response::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            response::build_error_response(StatusCode::FORBIDDEN, "403 Forbidden")
        }
        _ => {
            logger::log_error(&format!("Failed to open '{name}': {error}"));
            response::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "500 Internal Server Error",
            )
        }
    }
}

/// 301 to `target`, keeping the headers already written for this response
fn redirect(target: &str, mut preset: HeaderMap) -> Response<Full<Bytes>> {
    let mut response = response::build_redirect_response(target);
    preset.extend(response.headers_mut().drain());
    *response.headers_mut() = preset;
    response
}

/// Relative redirect from `/dir` to `dir/`
fn directory_redirect(req: &Parts) -> String {
    let path = req.uri.path();
    let base = path.rsplit('/').next().unwrap_or(path);
    with_query(req, &format!("{base}/"))
}

/// Append the request's query string to a redirect target
fn with_query(req: &Parts, target: &str) -> String {
    match req.uri.query() {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target.to_string(),
    }
}

/// True if any `/`- or `\`-separated element of `path` is `..`
fn contains_dot_dot(path: &str) -> bool {
    path.contains("..") && path.split(['/', '\\']).any(|elem| elem == "..")
}

fn header_str<'a>(req: &'a Parts, name: &HeaderName) -> Option<&'a str> {
    req.headers.get(name).and_then(|v| v.to_str().ok())
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => logger::log_warning(&format!("Skipping invalid {name} header: {e}")),
    }
}
