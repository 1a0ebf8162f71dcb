//! Content module - post metadata, slugs, content bodies and listings

pub mod listing;
mod post;
pub mod resolver;
pub mod slug;
pub mod store;

pub use post::{Post, PostWithContent};
pub use resolver::ContentResolver;
pub use store::PostStore;
