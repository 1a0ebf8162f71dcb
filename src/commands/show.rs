//! Render a single post to stdout

use anyhow::Result;

use crate::render::Highlighter;
use crate::Blog;

/// Resolve a post by slug and print its rendered body
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let store = blog.load_store()?;
    let Some(post) = store.get_by_slug(slug) else {
        anyhow::bail!("No post matches slug {:?}", slug);
    };

    tracing::info!("Rendering post {} ({:?})", post.id, post.title);

    match blog.resolver().resolve_content(post).await {
        Some(body) => {
            if let Err(e) = Highlighter::global().ready().await {
                tracing::warn!("Rendering without highlighting: {}", e);
            }
            let doc = blog.renderer().render(&body);
            println!("{}", doc.to_html());
        }
        None => println!("This blog content is not available yet."),
    }

    Ok(())
}
