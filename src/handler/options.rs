//! Handler options

use super::path::default_path_extractor;
use hyper::header::HeaderMap;
use hyper::http::request::Parts;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Entry document looked up in the root when none is configured
pub const DEFAULT_ENTRY_DOCUMENT: &str = "index.html";

/// Maps a request to the relative path looked up in the root
pub type PathExtractor = Arc<dyn Fn(&Parts) -> String + Send + Sync>;

/// Maps a request to the value bag the entry template is rendered with
pub type ValuesProvider = Arc<dyn Fn(&Parts) -> Value + Send + Sync>;

/// Options for [`StaticHandler::new`](super::StaticHandler::new).
///
/// Every field has a default; calling a setter twice keeps the last value.
///
/// ```
/// use spa_static::StaticOptions;
/// use serde_json::json;
///
/// let options = StaticOptions::new()
///     .entry_document("app.html")
///     .values_provider(|parts| json!({ "Path": parts.uri.path() }));
/// assert!(options.is_dynamic());
/// ```
#[derive(Clone)]
pub struct StaticOptions {
    pub(crate) entry_document: String,
    pub(crate) headers: HeaderMap,
    pub(crate) path_extractor: PathExtractor,
    pub(crate) values_provider: Option<ValuesProvider>,
}

impl Default for StaticOptions {
    fn default() -> Self {
        Self {
            entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
            headers: HeaderMap::new(),
            path_extractor: Arc::new(default_path_extractor),
            values_provider: None,
        }
    }
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the entry document inside the root (default `index.html`)
    #[must_use]
    pub fn entry_document(mut self, name: impl Into<String>) -> Self {
        self.entry_document = name.into();
        self
    }

    /// Extra headers written on served files and entry responses.
    ///
    /// The map is applied as a whole: a name holding several values is sent
    /// once per value, not collapsed to its first value.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the default request → lookup key mapping
    #[must_use]
    pub fn path_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&Parts) -> String + Send + Sync + 'static,
    {
        self.path_extractor = Arc::new(extractor);
        self
    }

    /// Render the entry document per request with the returned values.
    ///
    /// Entry responses then carry `Cache-Control: no-store`.
    #[must_use]
    pub fn values_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Parts) -> Value + Send + Sync + 'static,
    {
        self.values_provider = Some(Arc::new(provider));
        self
    }

    pub const fn is_dynamic(&self) -> bool {
        self.values_provider.is_some()
    }
}

impl fmt::Debug for StaticOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticOptions")
            .field("entry_document", &self.entry_document)
            .field("headers", &self.headers)
            .field("dynamic", &self.is_dynamic())
            .finish_non_exhaustive()
    }
}
