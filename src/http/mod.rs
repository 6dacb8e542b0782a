//! HTTP protocol layer
//!
//! The file-serving primitive and the protocol helpers it is built from.
//! Nothing here knows about single-page applications.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;
pub mod serve;

pub use response::{build_404_response, build_status_response};
pub use serve::serve_file;
