//! Slug derivation and comparison
//!
//! Slugs are never stored. Every caller derives them from a post title with
//! [`to_slug`] and compares them through [`normalize`], so the URL a listing
//! links to and the lookup that serves it always agree.

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9_\s.\-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s_\-]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive the URL slug for a title
///
/// # Examples
/// ```
/// use inkwell::content::slug::to_slug;
/// assert_eq!(to_slug("Hello, World! Guide"), "hello-world-guide");
/// ```
pub fn to_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept = DISALLOWED.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&kept, "-");
    joined.trim_matches('-').to_string()
}

/// Bring a slug taken from a request path into comparable form
///
/// Percent-decodes, lowercases and turns whitespace runs into hyphens.
pub fn normalize(slug: &str) -> String {
    let decoded = percent_decode_str(slug).decode_utf8_lossy();
    let lowered = decoded.trim().to_lowercase();
    WHITESPACE.replace_all(&lowered, "-").into_owned()
}

/// Whether `title` resolves to the `requested` slug
pub fn slug_matches(title: &str, requested: &str) -> bool {
    normalize(&to_slug(title)) == normalize(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

    #[test]
    fn test_to_slug_punctuation() {
        assert_eq!(to_slug("Hello, World! Guide"), "hello-world-guide");
        assert_eq!(to_slug("Rust & WebAssembly: A Primer"), "rust-webassembly-a-primer");
    }

    #[test]
    fn test_to_slug_separators() {
        assert_eq!(to_slug("  snake_case   and--dashes  "), "snake-case-and-dashes");
        assert_eq!(to_slug("--leading and trailing--"), "leading-and-trailing");
        assert_eq!(to_slug("tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn test_to_slug_keeps_dots_and_digits() {
        assert_eq!(to_slug("Release v1.2 Notes"), "release-v1.2-notes");
        assert_eq!(to_slug("Top 10 Tips"), "top-10-tips");
    }

    #[test]
    fn test_to_slug_drops_non_ascii_letters() {
        assert_eq!(to_slug("Café Crème"), "caf-crme");
        assert_eq!(to_slug("日本語"), "");
    }

    #[test]
    fn test_to_slug_is_deterministic() {
        let title = "Understanding async/await in Rust";
        assert_eq!(to_slug(title), to_slug(title));
        assert_eq!(to_slug(title), "understanding-asyncawait-in-rust");
    }

    #[test]
    fn test_normalize_decodes_and_lowercases() {
        assert_eq!(normalize("Hello%20World"), "hello-world");
        assert_eq!(normalize("HELLO-WORLD-GUIDE"), "hello-world-guide");
        assert_eq!(normalize("hello   world"), "hello-world");
    }

    #[test]
    fn test_normalize_is_stable_under_percent_encoding() {
        for title in ["Hello, World! Guide", "Release v1.2 Notes", "a_b c-d"] {
            let slug = to_slug(title);
            let encoded = utf8_percent_encode(&slug, NON_ALPHANUMERIC).to_string();
            assert_eq!(normalize(&slug), normalize(&encoded), "title {title:?}");
        }
    }

    #[test]
    fn test_slug_matches() {
        assert!(slug_matches("Hello, World! Guide", "hello-world-guide"));
        assert!(slug_matches("Hello, World! Guide", "Hello-World-Guide"));
        assert!(!slug_matches("Hello, World! Guide", "hello-world"));
    }
}
