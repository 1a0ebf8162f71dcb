//! Error types for loading the post corpus and site configuration

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading the corpus or configuration.
///
/// Lookups that miss (unknown id, unknown slug) and content files that cannot
/// be read are not errors: they surface as `None` from the store and resolver.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid post corpus {path:?}: {source}")]
    Corpus {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("duplicate post id {0}")]
    DuplicateId(u64),

    #[error("posts {first} and {second} share the slug {slug:?}")]
    SlugCollision { slug: String, first: u64, second: u64 },
}

pub type Result<T> = std::result::Result<T, BlogError>;
