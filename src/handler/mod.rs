//! Request handler module
//!
//! The SPA handler, its options and the helpers that turn a request into a
//! lookup key.

pub mod options;
pub mod path;
pub mod spa;

pub use options::{PathExtractor, StaticOptions, ValuesProvider, DEFAULT_ENTRY_DOCUMENT};
pub use path::default_path_extractor;
pub use spa::{Outcome, StaticHandler};
