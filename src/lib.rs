//! inkwell: a small read-only blog server
//!
//! Post metadata lives in a JSON corpus, post bodies in per-post markdown
//! files joined to the metadata by slug. This crate loads both, serves them
//! over a handful of JSON and HTML endpoints, and renders bodies into
//! sanitized, highlighted, anchor-annotated HTML.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod render;
pub mod server;
pub mod views;

use std::path::{Path, PathBuf};

use content::{ContentResolver, PostStore};
use error::Result;
use render::MarkdownRenderer;

/// A blog rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Metadata corpus (JSON array of posts)
    pub data_file: PathBuf,
    /// Directory of markdown content bodies
    pub content_dir: PathBuf,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl Blog {
    /// Open a blog directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let data_file = base_dir.join(&config.data_file);
        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            data_file,
            content_dir,
            static_dir,
        }
    }

    /// Load the post corpus
    pub fn load_store(&self) -> Result<PostStore> {
        PostStore::load(&self.data_file, self.config.slug_collision)
    }

    pub fn resolver(&self) -> ContentResolver {
        ContentResolver::new(&self.content_dir, &self.config.content_ext)
    }

    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::from_config(&self.config)
    }
}
