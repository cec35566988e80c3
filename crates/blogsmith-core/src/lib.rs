//! blogsmith core library
//!
//! Documents, front matter, build configuration, and error handling shared by
//! the blogsmith renderer and generator.

pub mod config;
pub mod document;
pub mod error;
pub mod escape;
pub mod frontmatter;

pub use config::{Analytics, BuildConfig};
pub use document::{ContentType, Document};
pub use error::{CoreError, Result};
pub use escape::escape_html;
pub use frontmatter::Frontmatter;
