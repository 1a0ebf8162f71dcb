//! Content resolver - joins a post to its markdown body on disk

use std::path::{Path, PathBuf};

use super::slug::to_slug;
use super::{Post, PostWithContent};

/// Locates content bodies in the content directory
///
/// A post's body lives at `<content_dir>/<stem>.<ext>`. The stem is the post's
/// `contentRef` when it has one, otherwise the slug of its title. Missing or
/// unreadable files resolve to `None`; the post is then shown without a body.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    content_dir: PathBuf,
    extension: String,
}

impl ContentResolver {
    pub fn new<P: AsRef<Path>>(content_dir: P, extension: &str) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Candidate file paths for a post, in lookup order
    pub fn candidates(&self, post: &Post) -> Vec<PathBuf> {
        let mut stems = Vec::new();

        if let Some(reference) = post.content_ref.as_deref() {
            if is_safe_stem(reference) {
                stems.push(reference.to_string());
            } else {
                tracing::warn!(
                    "Ignoring contentRef {:?} on post {}: not a plain file name",
                    reference,
                    post.id
                );
            }
        }

        let slug = to_slug(&post.title);
        if !slug.is_empty() && !stems.contains(&slug) {
            stems.push(slug);
        }

        stems
            .into_iter()
            .map(|stem| self.path_for(&stem))
            .collect()
    }

    /// Load the content body for a post, or `None` when it cannot be read
    pub async fn resolve_content(&self, post: &Post) -> Option<String> {
        for path in self.candidates(post) {
            match tokio::fs::read_to_string(&path).await {
                Ok(body) => {
                    tracing::debug!("Resolved content for post {} from {:?}", post.id, path);
                    return Some(body);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!("No content file at {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to read content {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Content not available for post {} ({:?})", post.id, post.title);
        None
    }

    /// Resolve content and merge it into the post record
    pub async fn attach(&self, post: &Post) -> PostWithContent {
        PostWithContent {
            post: post.clone(),
            content: self.resolve_content(post).await,
        }
    }

    fn path_for(&self, stem: &str) -> PathBuf {
        self.content_dir.join(format!("{}.{}", stem, self.extension))
    }
}

/// A content reference must name a file directly inside the content directory
fn is_safe_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem != "."
        && stem != ".."
        && !stem.contains(|c: char| c == '/' || c == '\\')
        && !stem.contains("..")
}
