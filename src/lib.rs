//! Static file handler for single-page applications.
//!
//! [`StaticHandler`] serves files from a [`FileSystem`] root. Requests that
//! match no file and carry no file extension are answered with the entry
//! document (`index.html` by default), optionally rendered as a template with
//! per-request values. Missing assets get a plain 404, and methods other than
//! GET and HEAD are handed back untouched through [`Outcome::Next`].
//!
//! ```no_run
//! use spa_static::{DirFs, Outcome, StaticHandler, StaticOptions};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let root = DirFs::new("./public")?;
//! let options = StaticOptions::new()
//!     .values_provider(|parts| json!({ "Path": parts.uri.path() }));
//! let handler = StaticHandler::new(root, options).await?;
//!
//! let req = hyper::Request::get("/dashboard").body(())?;
//! if let Outcome::Respond(response) = handler.handle(req).await? {
//!     assert_eq!(response.status(), 200);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod template;

pub use error::{StaticError, TemplateError};
pub use fs::{DirFs, FileInfo, FileSystem, MemoryFs, OpenedFile};
pub use handler::{Outcome, StaticHandler, StaticOptions};
pub use template::Template;
