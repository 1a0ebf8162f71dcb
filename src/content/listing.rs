//! Recency listings over the post store

use std::cmp::Reverse;

use super::{Post, PostStore};

/// Every post, most recently updated first
///
/// Posts whose `updatedAt` does not parse sort after all dated posts. Ties,
/// including among undated posts, keep corpus order.
pub fn all_sorted_by_recency(store: &PostStore) -> Vec<&Post> {
    let mut posts: Vec<&Post> = store.get_all().iter().collect();
    // Option orders None first, so Reverse puts undated posts last
    posts.sort_by_key(|post| Reverse(post.updated()));
    posts
}

/// The `n` most recently updated posts
pub fn latest(store: &PostStore, n: usize) -> Vec<&Post> {
    let mut posts = all_sorted_by_recency(store);
    posts.truncate(n);
    posts
}
