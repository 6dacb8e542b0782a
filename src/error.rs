//! Error types
//!
//! Only two things can go wrong inside the handler: building it (entry document
//! missing or unparsable) and rendering the entry template for a request.
//! File-open failures during request handling are never errors; they drive the
//! fallback decision instead.

use thiserror::Error;

/// Template parse or render failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template: {message}")]
pub struct TemplateError {
    pub message: String,
    /// Byte offset into the template source, when known
    pub offset: Option<usize>,
}

impl TemplateError {
    pub(crate) fn at(offset: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: Some(offset),
        }
    }

    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StaticError {
    /// The entry document could not be opened at construction time
    #[error("failed to open entry document '{path}': {source}")]
    EntryDocument {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The entry document is not a valid template
    #[error("invalid entry document: {0}")]
    Template(TemplateError),

    /// Rendering the entry template failed for a request.
    ///
    /// Hosts must treat this as an unrecoverable failure of that request
    /// (abort the connection or answer 500 at the outermost boundary).
    #[error("failed to render entry document: {0}")]
    Render(TemplateError),
}

impl StaticError {
    /// True for failures that happen while serving a request
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StaticError::EntryDocument {
            path: "index.html".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("index.html"));
        assert!(!err.is_render());

        let err = StaticError::Render(TemplateError::new("boom"));
        assert_eq!(err.to_string(), "failed to render entry document: template: boom");
        assert!(err.is_render());
    }
}
