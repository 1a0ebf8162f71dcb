//! HTTP server: JSON post endpoints and HTML blog pages

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::num::{IntErrorKind, ParseIntError};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{listing, ContentResolver, Post, PostStore, PostWithContent};
use crate::helpers::url_for;
use crate::render::{Highlighter, MarkdownRenderer};
use crate::{views, Blog};

/// Read-only state shared by every handler
pub struct AppState {
    pub config: SiteConfig,
    pub store: PostStore,
    pub resolver: ContentResolver,
    pub renderer: MarkdownRenderer,
    pub static_dir: std::path::PathBuf,
}

impl AppState {
    /// Load the corpus for a blog
    pub fn load(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            store: blog.load_store()?,
            resolver: blog.resolver(),
            renderer: blog.renderer(),
            static_dir: blog.static_dir.clone(),
        })
    }
}

/// Errors surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid blog ID")]
    InvalidId,

    #[error("Blog not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Build the application router, mounted under the configured `root`
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    let routes = Router::new()
        .route("/", get(home))
        .route("/posts", get(list_posts))
        .route("/posts/latest", get(latest_posts))
        .route("/posts/", get(missing_id))
        .route("/posts/:id", get(get_post))
        .route("/posts/by-slug/:slug", get(get_post_by_slug))
        .route("/blogs", get(blog_index))
        .route("/blogs/:slug", get(blog_page))
        .nest_service("/static", static_files);

    let app = match mount_point(&state.config) {
        Some(root) => Router::new().nest(&root, routes),
        None => routes,
    };

    app.fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Path prefix for `root`, or `None` when mounted at `/`
fn mount_point(config: &SiteConfig) -> Option<String> {
    let root = config.root.trim_matches('/');
    if root.is_empty() {
        None
    } else {
        Some(format!("/{}", root))
    }
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    Highlighter::global().warm_up();

    let state = Arc::new(AppState::load(blog)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Server running at http://{}:{}{}",
        ip,
        port,
        url_for(&blog.config, "blogs")
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&url_for(&state.config, "blogs"))
}

async fn list_posts(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    let posts = listing::all_sorted_by_recency(&state.store);
    Json(posts.into_iter().cloned().collect())
}

async fn latest_posts(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    let posts = listing::latest(&state.store, state.config.latest_count);
    Json(posts.into_iter().cloned().collect())
}

async fn missing_id() -> ApiError {
    ApiError::InvalidId
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PostWithContent>, ApiError> {
    // Integers too large for any stored id are unknown, not malformed
    let id: u64 = id.trim().parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => ApiError::NotFound,
        _ => {
            tracing::debug!("Rejecting post id {:?}", id);
            ApiError::InvalidId
        }
    })?;
    let post = state.store.get_by_id(id).ok_or(ApiError::NotFound)?;
    Ok(Json(state.resolver.attach(post).await))
}

async fn get_post_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostWithContent>, ApiError> {
    let post = state.store.get_by_slug(&slug).ok_or(ApiError::NotFound)?;
    Ok(Json(state.resolver.attach(post).await))
}

async fn blog_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let posts = listing::all_sorted_by_recency(&state.store);
    Html(views::post_list(&state.config, &posts))
}

async fn blog_page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let Some(post) = state.store.get_by_slug(&slug) else {
        tracing::debug!("No post for slug {:?}", slug);
        return not_found_page(&state.config);
    };

    let rendered = state
        .resolver
        .resolve_content(post)
        .await
        .map(|body| state.renderer.render(&body));

    Html(views::post_page(&state.config, post, rendered.as_ref())).into_response()
}

async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    not_found_page(&state.config)
}

fn not_found_page(config: &SiteConfig) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(config))).into_response()
}
