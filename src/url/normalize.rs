use crate::UrlError;
use url::Url;

/// Normalizes a user-supplied audit target into an absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prepend `https://` when no scheme is given
/// 3. Parse the URL; reject if malformed
/// 4. Only HTTP and HTTPS are accepted
/// 5. A host is required
/// 6. Remove fragment (never sent to the server)
///
/// Path and query are kept as given: the audit fetches exactly what was asked.
///
/// # Examples
///
/// ```
/// use botsight::url::normalize_target;
///
/// let url = normalize_target("example.com/docs").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_target(input: &str) -> Result<Url, UrlError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let with_scheme = if has_scheme(raw) {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns true if the input already carries an explicit scheme
fn has_scheme(raw: &str) -> bool {
    match raw.find("://") {
        Some(idx) => raw[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        None => false,
    }
}

/// Builds the robots.txt location for the origin of `url`
pub fn robots_url(url: &Url) -> Result<Url, UrlError> {
    url.join("/robots.txt")
        .map_err(|e| UrlError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_https() {
        let result = normalize_target("example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_keep_http() {
        let result = normalize_target("http://example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_scheme_case_insensitive() {
        let result = normalize_target("HTTPS://Example.com/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_trim_whitespace() {
        let result = normalize_target("  example.com/a?b=1  ").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a?b=1");
    }

    #[test]
    fn test_keep_port_without_scheme() {
        let result = normalize_target("localhost:8080/x").unwrap();
        assert_eq!(result.as_str(), "https://localhost:8080/x");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_target("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(normalize_target("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_target("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_target("https://exa mple.com").is_err());
    }

    #[test]
    fn test_robots_url() {
        let url = Url::parse("https://example.com/deep/path?q=1").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://example.com/robots.txt"
        );
    }
}
