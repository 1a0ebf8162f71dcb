use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tower::ServiceExt;

use inkwell::config::SiteConfig;
use inkwell::server::{router, AppState};
use inkwell::Blog;

const POSTS: &str = r#"[
  {"id": 1, "title": "Hello, World! Guide", "description": "Start here",
   "coverImage": "", "author": "Ada",
   "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-05T00:00:00Z"},
  {"id": 2, "title": "Second Thoughts", "description": "More",
   "coverImage": "/static/second.png", "author": "Ada",
   "createdAt": "2024-01-02T00:00:00Z", "updatedAt": "2024-03-01T00:00:00Z"},
  {"id": 3, "title": "No Body Yet", "description": "Draft",
   "coverImage": "", "author": "Grace",
   "createdAt": "2024-01-03T00:00:00Z", "updatedAt": "2024-02-01T00:00:00Z"},
  {"id": 4, "title": "Old News", "description": "Ancient",
   "coverImage": "", "author": "Grace",
   "createdAt": "2023-01-01T00:00:00Z", "updatedAt": "2023-01-01T00:00:00Z"},
  {"id": 5, "title": "Fresh Ink", "description": "Newest",
   "coverImage": "", "author": "Linus",
   "createdAt": "2024-04-01T00:00:00Z", "updatedAt": "2024-04-02T00:00:00Z"}
]"#;

fn setup() -> (tempfile::TempDir, Router) {
    setup_with(SiteConfig::default())
}

fn setup_with(config: SiteConfig) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::create_dir_all(dir.path().join("content")).unwrap();
    fs::write(dir.path().join("data/blogs.json"), POSTS).unwrap();
    fs::write(
        dir.path().join("content/hello-world-guide.md"),
        "## Welcome\n\nHi there.\n\n<script>alert(1)</script>\n",
    )
    .unwrap();
    fs::write(dir.path().join("content/second-thoughts.md"), "Second body").unwrap();

    let blog = Blog::with_config(dir.path(), config);
    let state = AppState::load(&blog).unwrap();
    (dir, router(Arc::new(state)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_all_posts_sorted_by_recency() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![5, 2, 3, 1, 4]);
    assert_eq!(json[0]["coverImage"], "");
    assert_eq!(json[0]["updatedAt"], "2024-04-02T00:00:00Z");
    assert!(json[0].get("content").is_none());
}

#[tokio::test]
async fn test_latest_posts() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![5, 2, 3]);
}

#[tokio::test]
async fn test_post_with_content() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 2);
    assert_eq!(json["title"], "Second Thoughts");
    assert_eq!(json["content"], "Second body");
}

#[tokio::test]
async fn test_post_without_content_file() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 3);
    assert!(json.get("content").is_none());
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts/9999999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Blog not found");
    assert!(json.get("id").is_none());
}

#[tokio::test]
async fn test_bad_ids_are_400() {
    let (_dir, app) = setup();

    for uri in ["/posts/", "/posts/abc", "/posts/-1", "/posts/1.5"] {
        let (status, json) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["message"], "Invalid blog ID");
    }
}

#[tokio::test]
async fn test_id_beyond_u64_is_404() {
    let (_dir, app) = setup();
    let (status, json) = get_json(&app, "/posts/99999999999999999999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Blog not found");
}

#[tokio::test]
async fn test_post_by_slug() {
    let (_dir, app) = setup();

    let (status, json) = get_json(&app, "/posts/by-slug/hello-world-guide").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);
    assert!(json["content"].as_str().unwrap().contains("## Welcome"));

    let (status, json) = get_json(&app, "/posts/by-slug/Hello%2DWorld%2DGuide").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);

    let (status, _) = get_json(&app, "/posts/by-slug/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_index_page() {
    let (_dir, app) = setup();
    let (status, html) = get(&app, "/blogs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Fresh Ink"));
    assert!(html.contains(r#"src="/static/second.png""#));
    assert!(html.contains("https://via.placeholder.com/400x250"));
    assert!(html.contains(r#"href="/blogs/hello-world-guide""#));
}

#[tokio::test]
async fn test_blog_page_renders_sanitized_content() {
    let (_dir, app) = setup();
    let (status, html) = get(&app, "/blogs/hello-world-guide").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<h2 id="welcome">"#));
    assert!(html.contains("<p>Hi there.</p>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("alert(1)"));
}

#[tokio::test]
async fn test_blog_page_without_content() {
    let (_dir, app) = setup();
    let (status, html) = get(&app, "/blogs/no-body-yet").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This blog content is not available yet."));
}

#[tokio::test]
async fn test_unknown_pages_are_404() {
    let (_dir, app) = setup();

    let (status, _) = get(&app, "/blogs/missing-post").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/contact").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_routes_mounted_under_root() {
    let mut config = SiteConfig::default();
    config.root = "/journal/".to_string();
    let (_dir, app) = setup_with(config);

    let (status, html) = get(&app, "/journal/blogs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/journal/blogs/hello-world-guide""#));
    assert!(html.contains(r#"<a href="/journal/blogs">"#));

    let (status, html) = get(&app, "/journal/blogs/hello-world-guide").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<h2 id="welcome">"#));

    let (status, json) = get_json(&app, "/journal/posts/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![5, 2, 3]);

    let (status, _) = get(&app, "/journal/posts/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/journal").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/journal/blogs");

    let (status, _) = get(&app, "/blogs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
