//! src/extract.rs
//!
//! Purpose:
//!   Pull every absolute http/https URL out of a response body so the
//!   worker can hand each one to the frontier via `admit`.
//!
//! Extraction is a single case-insensitive, global regex match over the
//! raw body -- no HTML/DOM parsing -- so it works identically over any
//! text response, malformed markup included.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: &str =
    r"(?i)https?://(www\.)?[-A-Za-z0-9@:%._+~#=]{1,256}\.[A-Za-z0-9()]{1,6}\b([-A-Za-z0-9()@:%_+.~#?&/=]*)";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(URL_PATTERN).expect("url extraction pattern is valid regex"));

/// Return every absolute http/https URL found in `body`, in the order they
/// appear. Duplicates within a single body are not filtered here -- that is
/// the frontier's job (dedup against the seen-set happens at `admit`).
pub fn extract_urls(body: &str) -> Vec<String> {
    URL_RE.find_iter(body).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_link() {
        let body = "please see http://b.test/p for more";
        assert_eq!(extract_urls(body), vec!["http://b.test/p".to_string()]);
    }

    #[test]
    fn finds_multiple_links_in_order() {
        let body = "one https://a.test/x two http://b.test/y three";
        assert_eq!(
            extract_urls(body),
            vec![
                "https://a.test/x".to_string(),
                "http://b.test/y".to_string(),
            ]
        );
    }

    #[test]
    fn is_case_insensitive_on_scheme() {
        let body = "HTTPS://EXAMPLE.COM/page";
        assert_eq!(extract_urls(body), vec!["HTTPS://EXAMPLE.COM/page".to_string()]);
    }

    #[test]
    fn ignores_non_http_schemes() {
        let body = "ftp://files.test/x and mailto:a@b.test and plain text";
        assert!(extract_urls(body).is_empty());
    }

    #[test]
    fn no_links_returns_empty() {
        assert!(extract_urls("no links in here at all").is_empty());
    }

    #[test]
    fn captures_query_and_fragment_tail() {
        let body = "http://a.test/path?x=1&y=2#frag more text";
        assert_eq!(
            extract_urls(body),
            vec!["http://a.test/path?x=1&y=2#frag".to_string()]
        );
    }
}
