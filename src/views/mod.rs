//! HTML pages for the blog listing and post detail views

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{full_date, html_escape, post_url, time_tag, truncate, url_for};
use crate::render::RenderedDocument;

const CONTENT_MISSING: &str = "This blog content is not available yet.";

/// Wrap a page body in the site layout
fn layout(config: &SiteConfig, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
</head>
<body>
<header><a href="{home}">{site}</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = html_escape(title),
        site = html_escape(&config.title),
        home = url_for(config, "blogs"),
        body = body,
    )
}

/// Card grid of posts
pub fn post_list(config: &SiteConfig, posts: &[&Post]) -> String {
    let mut html = String::from(r#"<h1>All Blogs</h1>"#);

    if posts.is_empty() {
        html.push_str(r#"<p class="empty">No blogs found.</p>"#);
        return layout(config, "All Blogs", &html);
    }

    html.push_str(r#"<div class="blog-grid">"#);
    for post in posts {
        html.push_str(&format!(
            r#"<article class="blog-card"><img src="{image}" alt="{title}" width="200" height="150"><h3>{title}</h3><p>{description}</p><a href="{url}">Read More</a></article>"#,
            image = html_escape(post.cover_or(&config.placeholder_image)),
            title = html_escape(&post.title),
            description = html_escape(&truncate(&post.description, 200, None)),
            url = post_url(config, post),
        ));
    }
    html.push_str("</div>");

    layout(config, "All Blogs", &html)
}

/// Detail page for one post; `rendered` is `None` when its body is missing
pub fn post_page(config: &SiteConfig, post: &Post, rendered: Option<&RenderedDocument>) -> String {
    let mut html = String::from("<article>");

    if !post.cover_image.trim().is_empty() {
        html.push_str(&format!(
            r#"<img class="cover" src="{}" alt="{}" width="800" height="400">"#,
            html_escape(&post.cover_image),
            html_escape(&post.title)
        ));
    }

    let date = match post.created() {
        Some(created) => time_tag(&created),
        None => html_escape(&post.created_at),
    };
    html.push_str(&format!(
        r#"<h1>{}</h1><p class="description">{}</p><p class="byline">By {} · {}</p>"#,
        html_escape(&post.title),
        html_escape(&post.description),
        html_escape(&post.author),
        date
    ));

    match rendered {
        Some(doc) => {
            let toc: Vec<String> = doc
                .headings
                .iter()
                .filter(|heading| heading.level == 2 || heading.level == 3)
                .map(|heading| {
                    format!(
                        r##"<li class="toc-h{}"><a href="#{}">{}</a></li>"##,
                        heading.level,
                        html_escape(&heading.id),
                        html_escape(&heading.text)
                    )
                })
                .collect();
            if !toc.is_empty() {
                html.push_str(&format!(r#"<nav class="toc"><ul>{}</ul></nav>"#, toc.concat()));
            }
            html.push_str(&format!(r#"<div class="prose">{}</div>"#, doc.to_html()));
        }
        None => {
            html.push_str(&format!(r#"<p class="content-missing">{}</p>"#, CONTENT_MISSING));
        }
    }

    html.push_str("</article>");
    layout(config, &post.title, &html)
}

pub fn not_found(config: &SiteConfig) -> String {
    layout(
        config,
        "Not Found",
        r#"<h1>404</h1><p>The page you are looking for does not exist.</p>"#,
    )
}

/// Long form of a post's creation date, falling back to the raw value
pub fn display_date(post: &Post) -> String {
    post.created()
        .map(|created| full_date(&created))
        .unwrap_or_else(|| post.created_at.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::tests::post;
    use crate::render::{Highlighter, MarkdownRenderer};

    #[test]
    fn test_post_list_placeholder_image() {
        let config = SiteConfig::default();
        let mut with_cover = post(1, "Covered", "2024-01-01");
        with_cover.cover_image = "/static/c.png".to_string();
        let bare = post(2, "Bare <Post>", "2024-01-01");

        let html = post_list(&config, &[&with_cover, &bare]);
        assert!(html.contains(r#"src="/static/c.png""#));
        assert!(html.contains(r#"src="https://via.placeholder.com/400x250""#));
        assert!(html.contains("Bare &lt;Post&gt;"));
        assert!(html.contains(r#"href="/blogs/bare-post""#));
    }

    #[test]
    fn test_post_list_empty() {
        let html = post_list(&SiteConfig::default(), &[]);
        assert!(html.contains("No blogs found."));
    }

    #[test]
    fn test_post_page_without_content() {
        let html = post_page(&SiteConfig::default(), &post(1, "Draft", "2024-01-01"), None);
        assert!(html.contains(CONTENT_MISSING));
        assert!(html.contains("January 1, 2024"));
        assert!(!html.contains(r#"class="cover""#));
    }

    #[test]
    fn test_post_page_with_content() {
        let highlighter: &'static Highlighter = Box::leak(Box::new(Highlighter::new()));
        let renderer = MarkdownRenderer::new().with_highlighter(highlighter);
        let doc = renderer.render("## Setup\n\nBody text\n");

        let html = post_page(&SiteConfig::default(), &post(1, "Guide", "2024-01-01"), Some(&doc));
        assert!(html.contains(r##"<li class="toc-h2"><a href="#setup">Setup</a></li>"##));
        assert!(html.contains("<p>Body text</p>"));
        assert!(!html.contains(CONTENT_MISSING));
    }

    #[test]
    fn test_display_date() {
        let mut p = post(1, "Dated", "2024-01-01");
        assert_eq!(display_date(&p), "January 1, 2024");
        p.created_at = "someday".to_string();
        assert_eq!(display_date(&p), "someday");
    }
}
