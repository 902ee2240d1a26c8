use crate::error::{CoreError, Result};
use url::Url;

const PLACEHOLDER_HOST: &str = "placeholder.invalid";

/// The parts of a source URL used to look up redirects.
///
/// Absolute URLs keep their host; relative references (`/old`, `old?x=1`)
/// have an empty host and only contribute their path and query. The URL
/// parser normalizes both parts: hosts are lower-cased, dot segments are
/// resolved and non-ASCII characters are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInfo {
    host: String,
    path_with_query: String,
}

impl UrlInfo {
    /// Parses a raw source URL.
    ///
    /// Fails with [`CoreError::InvalidUrl`] for blank input, malformed URLs,
    /// URLs without a hierarchical path (`mailto:`) and absolute URLs without
    /// a host.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidUrl("url cannot be empty".to_string()));
        }

        match Url::parse(trimmed) {
            Ok(url) => Self::from_absolute(trimmed, &url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::from_relative(trimmed),
            Err(e) => Err(CoreError::InvalidUrl(format!("'{trimmed}': {e}"))),
        }
    }

    /// The host of the URL, empty for relative references.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The path of the URL followed by `?query` when a query is present.
    pub fn path_with_query(&self) -> &str {
        &self.path_with_query
    }

    fn from_absolute(raw: &str, url: &Url) -> Result<Self> {
        if url.cannot_be_a_base() {
            return Err(CoreError::InvalidUrl(format!(
                "'{raw}' does not have a hierarchical path"
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| CoreError::InvalidUrl(format!("'{raw}' has a scheme but no host")))?;

        Ok(Self {
            host: host.to_string(),
            path_with_query: path_with_query(url),
        })
    }

    fn from_relative(raw: &str) -> Result<Self> {
        let url = Url::parse(&format!("http://{PLACEHOLDER_HOST}/"))
            .and_then(|base| base.join(raw))
            .map_err(|e| CoreError::InvalidUrl(format!("'{raw}': {e}")))?;

        // scheme-relative references (`//host/path`) bring their own host
        let host = match url.host_str() {
            Some(PLACEHOLDER_HOST) | None => String::new(),
            Some(host) => host.to_string(),
        };

        Ok(Self {
            host,
            path_with_query: path_with_query(&url),
        })
    }
}

fn path_with_query(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url() {
        let info = UrlInfo::parse("https://Example.com/old/page?x=1&y=2").unwrap();
        assert_eq!(info.host(), "example.com");
        assert_eq!(info.path_with_query(), "/old/page?x=1&y=2");
    }

    #[test]
    fn absolute_url_without_path() {
        let info = UrlInfo::parse("https://example.com").unwrap();
        assert_eq!(info.host(), "example.com");
        assert_eq!(info.path_with_query(), "/");
    }

    #[test]
    fn relative_path_has_empty_host() {
        let info = UrlInfo::parse("/old").unwrap();
        assert_eq!(info.host(), "");
        assert_eq!(info.path_with_query(), "/old");
    }

    #[test]
    fn relative_path_without_leading_slash() {
        let info = UrlInfo::parse("old?page=2").unwrap();
        assert_eq!(info.host(), "");
        assert_eq!(info.path_with_query(), "/old?page=2");
    }

    #[test]
    fn scheme_relative_reference_keeps_host() {
        let info = UrlInfo::parse("//example.org/legacy").unwrap();
        assert_eq!(info.host(), "example.org");
        assert_eq!(info.path_with_query(), "/legacy");
    }

    #[test]
    fn empty_query_and_fragment_are_dropped() {
        let info = UrlInfo::parse("https://example.com/a?#section").unwrap();
        assert_eq!(info.path_with_query(), "/a");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let info = UrlInfo::parse("  /old  ").unwrap();
        assert_eq!(info.path_with_query(), "/old");
    }

    #[test]
    fn rejects_blank_input() {
        assert!(matches!(UrlInfo::parse(""), Err(CoreError::InvalidUrl(_))));
        assert!(matches!(UrlInfo::parse("   "), Err(CoreError::InvalidUrl(_))));
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(matches!(
            UrlInfo::parse("http://[::1"),
            Err(CoreError::InvalidUrl(_))
        ));
        assert!(matches!(
            UrlInfo::parse("mailto:someone@example.com"),
            Err(CoreError::InvalidUrl(_))
        ));
    }
}
