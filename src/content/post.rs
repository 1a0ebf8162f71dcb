//! Post metadata records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::to_slug;
use crate::helpers::parse_timestamp;

/// A blog post as declared in the metadata corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Primary lookup key
    pub id: u64,

    /// Display title; the slug is derived from it
    pub title: String,

    /// Summary shown in listings
    #[serde(default)]
    pub description: String,

    /// Cover image URL, empty when the post has none
    #[serde(default)]
    pub cover_image: String,

    #[serde(default)]
    pub author: String,

    /// ISO-8601 creation timestamp, kept verbatim
    pub created_at: String,

    /// ISO-8601 last update timestamp, kept verbatim
    pub updated_at: String,

    /// Content file stem, preferred over the derived slug when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_ref: Option<String>,
}

impl Post {
    /// URL slug derived from the title
    pub fn slug(&self) -> String {
        to_slug(&self.title)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    /// Cover image, or `placeholder` when the post has none
    pub fn cover_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.cover_image.trim().is_empty() {
            placeholder
        } else {
            &self.cover_image
        }
    }
}

/// A post merged with its content body for the detail endpoint
///
/// `content` is omitted from the JSON entirely when no body resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithContent {
    #[serde(flatten)]
    pub post: Post,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
