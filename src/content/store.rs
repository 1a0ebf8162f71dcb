//! Post store - the metadata corpus loaded from JSON

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::slug::{normalize, slug_matches, to_slug};
use super::Post;
use crate::config::SlugCollisionPolicy;
use crate::error::{BlogError, Result};

/// Read-only, corpus-ordered collection of posts
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    /// Load the corpus from a JSON array on disk
    pub fn load<P: AsRef<Path>>(path: P, policy: SlugCollisionPolicy) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| BlogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let posts: Vec<Post> =
            serde_json::from_str(&content).map_err(|source| BlogError::Corpus {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::from_posts(posts, policy)?;
        tracing::info!("Loaded {} posts from {:?}", store.len(), path);
        Ok(store)
    }

    /// Build a store from records already in memory
    pub fn from_posts(posts: Vec<Post>, policy: SlugCollisionPolicy) -> Result<Self> {
        let mut ids = HashSet::new();
        for post in &posts {
            if !ids.insert(post.id) {
                return Err(BlogError::DuplicateId(post.id));
            }
        }

        for (slug, first, second) in slug_collisions(&posts) {
            match policy {
                SlugCollisionPolicy::Reject => {
                    return Err(BlogError::SlugCollision {
                        slug,
                        first,
                        second,
                    })
                }
                SlugCollisionPolicy::FirstMatch => tracing::warn!(
                    "Posts {} and {} share slug {:?}; post {} is unreachable by slug",
                    first,
                    second,
                    slug,
                    second
                ),
            }
        }

        Ok(Self { posts })
    }

    /// All posts in corpus order
    pub fn get_all(&self) -> &[Post] {
        &self.posts
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// First post in corpus order whose title slug matches `slug`
    pub fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| slug_matches(&post.title, slug))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Pairs of post ids whose titles normalize to the same slug, as
/// `(slug, earlier id, later id)` in corpus order
pub fn slug_collisions(posts: &[Post]) -> Vec<(String, u64, u64)> {
    let mut seen: HashMap<String, u64> = HashMap::new();
    let mut collisions = Vec::new();

    for post in posts {
        let slug = normalize(&to_slug(&post.title));
        match seen.get(&slug) {
            Some(&first) => collisions.push((slug, first, post.id)),
            None => {
                seen.insert(slug, post.id);
            }
        }
    }

    collisions
}
