//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BlogError, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub root: String,

    // Corpus
    pub data_file: String,
    pub content_dir: String,
    pub content_ext: String,
    pub static_dir: String,

    // Listings
    pub latest_count: usize,
    pub placeholder_image: String,
    pub slug_collision: SlugCollisionPolicy,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            root: "/".to_string(),

            data_file: "data/blogs.json".to_string(),
            content_dir: "content".to_string(),
            content_ext: "md".to_string(),
            static_dir: "public".to_string(),

            latest_count: 3,
            placeholder_image: "https://via.placeholder.com/400x250".to_string(),
            slug_collision: SlugCollisionPolicy::FirstMatch,

            highlight: HighlightConfig::default(),
            images: ImageConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| BlogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| BlogError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What to do when two post titles produce the same slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugCollisionPolicy {
    /// Keep both; slug lookups return the earlier post in corpus order
    FirstMatch,
    /// Refuse to load the corpus
    Reject,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
    /// Languages eligible for highlighting; empty allows every known syntax
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
            languages: Vec::new(),
        }
    }
}

/// Intrinsic size stamped on rendered images
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}
