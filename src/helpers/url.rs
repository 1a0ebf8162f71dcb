//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::Post;

/// Everything but unreserved characters (RFC 3986)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/static/cover.png") // -> "/blog/static/cover.png"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_matches('/');
    let path = path.trim_start_matches('/');

    match (root.is_empty(), path.is_empty()) {
        (true, _) => format!("/{}", path),
        (false, true) => format!("/{}/", root),
        (false, false) => format!("/{}/{}", root, path),
    }
}

/// Encode a URL path segment
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

/// Link to a post's detail page
pub fn post_url(config: &SiteConfig, post: &Post) -> String {
    url_for(config, &format!("blogs/{}", encode_url(&post.slug())))
}
