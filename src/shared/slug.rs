//! Slug derivation for category and post names.
//!
//! Slugs are lowercase, hyphen-separated and URL-safe; uniqueness is the
//! caller's concern (the services probe the store and suffix a counter).

/// Fallback slug for names that reduce to nothing ("!!!", emoji-only, ...)
const EMPTY_SLUG_FALLBACK: &str = "untitled";

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, collapses non-alphanumeric runs to single hyphens and strips
/// leading/trailing separators. Deterministic: equal inputs yield equal
/// slugs.
pub fn generate_slug(input: &str) -> String {
    let slug = slug::slugify(input);
    if slug.is_empty() {
        EMPTY_SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}
