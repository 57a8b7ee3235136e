//! Blog data models.

pub mod blog;

pub use blog::{BlogListItem, BlogRecord};
