use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for the URL-safe slug shape used by categories and posts.
    /// Must be lowercase alphanumeric with single hyphen separators
    /// - Valid: "tech", "news-1", "rust-web-services"
    /// - Invalid: "-tech", "tech-", "tech--news", "Tech", "tech_news"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("tech"));
        assert!(SLUG_REGEX.is_match("news-1"));
        assert!(SLUG_REGEX.is_match("rust-web-services"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("2024"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-tech")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("tech-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("tech--news")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Tech")); // uppercase
        assert!(!SLUG_REGEX.is_match("tech_news")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("tech news")); // space
    }
}
