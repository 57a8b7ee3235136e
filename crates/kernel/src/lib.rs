//! Inkpress blog rendering kernel.
//!
//! Classifies, parses, sanitizes and assembles CMS blog content into blocks
//! that are safe to inject into a page. The `inkpress` binary is a thin CLI
//! over this library.

pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod page;

pub use content::{Block, ContentKind, SafeHtml};
pub use error::{AppError, AppResult};
pub use models::BlogRecord;
pub use page::{BlogPage, RenderOptions, render_blog, render_blog_page};
