//! Validate the post corpus against its content directory
//!
//! Listing order and slug lookups assume clean data: parsable timestamps,
//! unique slugs, and a content file for each post. This reports where the
//! corpus falls short, including content files no post points at any more
//! (typically left behind when a title was renamed).

use anyhow::Result;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::config::SlugCollisionPolicy;
use crate::content::store::slug_collisions;
use crate::content::PostStore;
use crate::Blog;

/// A single corpus problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    EmptyTitle {
        id: u64,
    },
    BadTimestamp {
        id: u64,
        field: &'static str,
        value: String,
    },
    UpdatedBeforeCreated {
        id: u64,
    },
    SlugCollision {
        slug: String,
        first: u64,
        second: u64,
    },
    MissingContent {
        id: u64,
        slug: String,
    },
    OrphanedContent {
        path: PathBuf,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::EmptyTitle { id } => write!(f, "post {} has an empty title", id),
            Problem::BadTimestamp { id, field, value } => {
                write!(f, "post {} has an unparsable {}: {:?}", id, field, value)
            }
            Problem::UpdatedBeforeCreated { id } => {
                write!(f, "post {} was updated before it was created", id)
            }
            Problem::SlugCollision {
                slug,
                first,
                second,
            } => write!(
                f,
                "posts {} and {} share slug {:?}; only {} is reachable",
                first, second, slug, first
            ),
            Problem::MissingContent { id, slug } => {
                write!(f, "post {} ({}) has no content file", id, slug)
            }
            Problem::OrphanedContent { path } => {
                write!(f, "content file {:?} belongs to no post", path)
            }
        }
    }
}

/// Inspect the corpus and collect every problem found
pub fn inspect(blog: &Blog) -> Result<Vec<Problem>> {
    let store = PostStore::load(&blog.data_file, SlugCollisionPolicy::FirstMatch)?;
    let resolver = blog.resolver();
    let mut problems = Vec::new();
    let mut referenced: HashSet<PathBuf> = HashSet::new();

    for post in store.get_all() {
        if post.title.trim().is_empty() {
            problems.push(Problem::EmptyTitle { id: post.id });
        }

        let created = post.created();
        let updated = post.updated();
        if created.is_none() {
            problems.push(Problem::BadTimestamp {
                id: post.id,
                field: "createdAt",
                value: post.created_at.clone(),
            });
        }
        if updated.is_none() {
            problems.push(Problem::BadTimestamp {
                id: post.id,
                field: "updatedAt",
                value: post.updated_at.clone(),
            });
        }
        if let (Some(created), Some(updated)) = (created, updated) {
            if updated < created {
                problems.push(Problem::UpdatedBeforeCreated { id: post.id });
            }
        }

        let candidates = resolver.candidates(post);
        if !candidates.iter().any(|path| path.is_file()) {
            problems.push(Problem::MissingContent {
                id: post.id,
                slug: post.slug(),
            });
        }
        referenced.extend(candidates);
    }

    for (slug, first, second) in slug_collisions(store.get_all()) {
        problems.push(Problem::SlugCollision {
            slug,
            first,
            second,
        });
    }

    let extension = blog.config.content_ext.trim_start_matches('.');
    if resolver.content_dir().is_dir() {
        for entry in WalkDir::new(resolver.content_dir())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_content = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(extension);
            if is_content && !referenced.contains(path) {
                problems.push(Problem::OrphanedContent {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    Ok(problems)
}

/// Print a report; returns the problems found
pub fn run(blog: &Blog) -> Result<Vec<Problem>> {
    let problems = inspect(blog)?;

    if problems.is_empty() {
        println!("Corpus OK");
    } else {
        println!("Problems ({}):", problems.len());
        for problem in &problems {
            println!("  {}", problem);
        }
    }

    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    fn blog_with(posts_json: &str, files: &[&str]) -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("data/blogs.json"), posts_json).unwrap();
        for file in files {
            fs::write(dir.path().join("content").join(file), "# Body").unwrap();
        }
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        (dir, blog)
    }

    #[test]
    fn test_clean_corpus() {
        let (_dir, blog) = blog_with(
            r#"[{"id": 1, "title": "Clean Post", "createdAt": "2024-01-01",
                 "updatedAt": "2024-01-02"}]"#,
            &["clean-post.md"],
        );
        assert!(inspect(&blog).unwrap().is_empty());
    }

    #[test]
    fn test_reports_problems() {
        let (dir, blog) = blog_with(
            r#"[
                {"id": 1, "title": "Hello World", "createdAt": "2024-02-01",
                 "updatedAt": "2024-01-01"},
                {"id": 2, "title": "Hello, World!", "createdAt": "soon",
                 "updatedAt": "2024-01-01"},
                {"id": 3, "title": "Renamed", "createdAt": "2024-01-01",
                 "updatedAt": "2024-01-01"}
            ]"#,
            &["hello-world.md", "old-title.md"],
        );

        let problems = inspect(&blog).unwrap();
        assert!(problems.contains(&Problem::UpdatedBeforeCreated { id: 1 }));
        assert!(problems.contains(&Problem::BadTimestamp {
            id: 2,
            field: "createdAt",
            value: "soon".to_string(),
        }));
        assert!(problems.contains(&Problem::SlugCollision {
            slug: "hello-world".to_string(),
            first: 1,
            second: 2,
        }));
        assert!(problems.contains(&Problem::MissingContent {
            id: 3,
            slug: "renamed".to_string(),
        }));
        assert!(problems.contains(&Problem::OrphanedContent {
            path: dir.path().join("content").join("old-title.md"),
        }));
        assert_eq!(problems.len(), 5);
    }
}
