//! Single-page application handler
//!
//! Existing files are served as they are. Anything else without a file
//! extension is treated as a client-side route and answered with the entry
//! document; missing assets (with an extension) get a 404.

use super::options::{PathExtractor, StaticOptions, ValuesProvider};
use super::path::extension;
use crate::error::{StaticError, TemplateError};
use crate::fs::FileSystem;
use crate::http::{self, cache, response};
use crate::logger;
use crate::template::Template;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode};
use std::fmt;
use std::io;

/// What the handler did with a request
#[derive(Debug)]
pub enum Outcome<B> {
    /// The handler answered; nothing further should run
    Respond(Response<Full<Bytes>>),
    /// Not a GET or HEAD: the untouched request for the next handler
    Next(Request<B>),
}

/// Serves files from a root and falls back to the entry document.
///
/// Built once at startup and shared read-only between requests, typically
/// behind an `Arc`.
#[derive(Clone)]
pub struct StaticHandler<F> {
    root: F,
    entry_content: Bytes,
    template: Template,
    headers: HeaderMap,
    path_extractor: PathExtractor,
    values_provider: Option<ValuesProvider>,
}

impl<F: FileSystem> StaticHandler<F> {
    /// Load and parse the entry document from `root`.
    ///
    /// Fails if the entry document cannot be opened or is not a valid template;
    /// a handler is never built half-working.
    pub async fn new(root: F, options: StaticOptions) -> Result<Self, StaticError> {
        let StaticOptions {
            entry_document,
            headers,
            path_extractor,
            values_provider,
        } = options;

        let entry = root
            .open(&entry_document)
            .await
            .map_err(|source| StaticError::EntryDocument {
                path: entry_document.clone(),
                source,
            })?;
        if entry.is_dir {
            return Err(StaticError::EntryDocument {
                path: entry_document,
                source: io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            });
        }

        let source = std::str::from_utf8(&entry.content).map_err(|e| {
            StaticError::Template(TemplateError::new(format!(
                "entry document is not valid UTF-8: {e}"
            )))
        })?;
        let template = Template::parse(source).map_err(StaticError::Template)?;

        logger::log_debug(&format!(
            "Loaded entry document '{entry_document}' ({} bytes, dynamic: {})",
            entry.content.len(),
            values_provider.is_some()
        ));

        Ok(Self {
            root,
            entry_content: entry.content,
            template,
            headers,
            path_extractor,
            values_provider,
        })
    }

    /// Handle one request.
    ///
    /// Returns [`Outcome::Next`] for methods other than GET and HEAD. The only
    /// error is [`StaticError::Render`], raised when the entry template fails
    /// to render; callers must not turn it into a normal response.
    pub async fn handle<B>(&self, req: Request<B>) -> Result<Outcome<B>, StaticError> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return Ok(Outcome::Next(req));
        }

        let (parts, _body) = req.into_parts();
        let key = (self.path_extractor)(&parts);

        // metadata only; content is read when the file is served
        if self.root.stat(&key).await.is_ok() {
            return Ok(Outcome::Respond(self.serve_file(&parts, &key).await));
        }

        if !extension(&key).is_empty() {
            logger::log_debug(&format!("Missing asset '{key}', answering 404"));
            return Ok(Outcome::Respond(http::build_status_response(
                StatusCode::NOT_FOUND,
            )));
        }

        self.serve_entry(&parts).map(Outcome::Respond)
    }

    async fn serve_file(&self, parts: &Parts, key: &str) -> Response<Full<Bytes>> {
        if parts.method == Method::HEAD {
            return http::build_status_response(StatusCode::OK);
        }
        http::serve_file(&self.root, parts, key, self.headers.clone()).await
    }

    fn serve_entry(&self, parts: &Parts) -> Result<Response<Full<Bytes>>, StaticError> {
        let mut headers = self.headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        let body = match &self.values_provider {
            None => self.entry_content.clone(),
            Some(provider) => {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache::NO_STORE));
                let values = provider(parts);
                let mut rendered = String::with_capacity(self.entry_content.len());
                self.template
                    .render_into(&values, &mut rendered)
                    .map_err(|e| {
                        logger::log_error(&format!(
                            "Rendering entry document for {} failed: {e}",
                            parts.uri.path()
                        ));
                        StaticError::Render(e)
                    })?;
                Bytes::from(rendered)
            }
        };

        Ok(response::build_content_response(
            StatusCode::OK,
            headers,
            body,
            parts.method == Method::HEAD,
        ))
    }
}

impl<F> fmt::Debug for StaticHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticHandler")
            .field("entry_bytes", &self.entry_content.len())
            .field("headers", &self.headers)
            .field("dynamic", &self.values_provider.is_some())
            .finish_non_exhaustive()
    }
}
