//! blogsmith generator library
//!
//! Turns a directory of markdown posts into a static blog.
//!
//! # Modules
//!
//! - [`loader`] - Post discovery, draft filtering, and date ordering
//! - [`template`] - Single-pass `{{ name }}` templates
//! - [`html`] - Post and index page composition
//! - [`rss`] - RSS feed generation
//! - [`sitemap`] - XML sitemap generation
//! - [`style`] - SCSS compilation
//! - [`assets`] - Static asset publishing
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod html;
pub mod loader;
pub mod rss;
pub mod sitemap;
pub mod style;
pub mod template;

pub use assets::AssetPublisher;
pub use build::{BuildError, BuildStats, Builder};
pub use html::{IndexContext, PageComposer, PostContext};
pub use loader::{Collection, ContentLoader, SkippedFile};
pub use rss::RssGenerator;
pub use sitemap::SitemapGenerator;
pub use style::StyleCompiler;
pub use template::{Template, TemplateContext, TemplateSet};
