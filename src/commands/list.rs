//! List posts

use anyhow::Result;

use crate::content::listing;
use crate::views::display_date;
use crate::Blog;

/// List posts, either all of them or the most recently updated
pub fn run(blog: &Blog, kind: &str, count: Option<usize>) -> Result<()> {
    let store = blog.load_store()?;

    let posts = match kind {
        "all" | "posts" => listing::all_sorted_by_recency(&store),
        "latest" => listing::latest(&store, count.unwrap_or(blog.config.latest_count)),
        _ => {
            anyhow::bail!("Unknown listing: {}. Available: all, latest", kind);
        }
    };

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - #{} {} [{}]",
            display_date(post),
            post.id,
            post.title,
            post.slug()
        );
    }

    Ok(())
}
