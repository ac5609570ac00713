//! URL Utility Functions
//!
//! URL validation, resolution of relative image sources, hostname
//! normalization for platform matching, and the domain key used to name
//! snapshot files.

use url::Url;

use crate::error::{Error, Result};

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse the URL a scrape was requested for.
///
/// Scheme-less input ("comic.naver.com/…") is accepted and treated as https.
pub fn parse_target(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl {
            url: input.to_string(),
            reason: "empty URL".to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match is_absolute_url(&candidate) {
        (true, Some(url)) => Ok(url),
        _ => Err(Error::InvalidUrl {
            url: input.to_string(),
            reason: "expected an http(s) URL with a host".to_string(),
        }),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// Protocol-relative (`//cdn…`) and path-relative sources are resolved
/// against `base`. `data:` URIs are returned unchanged.
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() || url_str.starts_with("data:") {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Hostname lowercased with any leading `www.` removed.
///
/// # Examples
/// ```
/// use rs_storyscrape::url_utils::normalized_host;
///
/// assert_eq!(normalized_host("https://WWW.Munpia.com/book/1"), Some("munpia.com".to_string()));
/// assert_eq!(normalized_host("not a url"), None);
/// ```
#[must_use]
pub fn normalized_host(url_str: &str) -> Option<String> {
    let (_, parsed) = is_absolute_url(url_str);
    parsed.and_then(|url| url.host_str().map(normalize_hostname))
}

/// Normalize a bare hostname: lowercase, trailing dot and `www.` removed.
#[must_use]
pub fn normalize_hostname(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Filesystem-safe key for a URL's domain.
///
/// Lowercase, `www.` stripped, runs of non-alphanumeric characters collapsed
/// to a single `-`.
///
/// # Examples
/// ```
/// use rs_storyscrape::url_utils::domain_key;
///
/// assert_eq!(domain_key("https://page.kakao.com/content/123"), "page-kakao-com");
/// assert_eq!(domain_key("https://www.comic.naver.com/webtoon/list"), "comic-naver-com");
/// ```
#[must_use]
pub fn domain_key(url_str: &str) -> String {
    let host = normalized_host(url_str).unwrap_or_else(|| normalize_hostname(url_str));

    let mut key = String::with_capacity(host.len());
    let mut pending_dash = false;
    for ch in host.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !key.is_empty() {
                key.push('-');
            }
            pending_dash = false;
            key.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

/// Path portion of an image URL, lowercased, for keyword checks.
///
/// Query strings and fragments are dropped; unparsable input is returned
/// lowercased as-is.
#[must_use]
pub fn source_path(src: &str) -> String {
    match Url::parse(src) {
        Ok(url) => url.path().to_lowercase(),
        Err(_) => src
            .split(['?', '#'])
            .next()
            .unwrap_or(src)
            .to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_accepts_https_and_bare_hosts() {
        let url = parse_target("comic.naver.com/webtoon/list?titleId=1").expect("valid");
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("comic.naver.com"));

        assert!(parse_target("http://munpia.com/").is_ok());
    }

    #[test]
    fn parse_target_rejects_garbage() {
        assert!(matches!(parse_target(""), Err(Error::InvalidUrl { .. })));
        assert!(matches!(parse_target("ftp://example.com"), Err(Error::InvalidUrl { .. })));
        assert!(matches!(parse_target("https://"), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn create_absolute_url_resolves_relative_sources() {
        let base = Url::parse("https://page.kakao.com/content/58000000").expect("valid");

        assert_eq!(
            create_absolute_url("/images/cover.jpg", &base),
            "https://page.kakao.com/images/cover.jpg"
        );
        assert_eq!(
            create_absolute_url("//dn-img.kakao.com/cover.png", &base),
            "https://dn-img.kakao.com/cover.png"
        );
        assert_eq!(
            create_absolute_url("https://cdn.example.com/a.jpg", &base),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(create_absolute_url("data:image/png;base64,xx", &base), "data:image/png;base64,xx");
    }

    #[test]
    fn domain_key_collapses_separators() {
        assert_eq!(domain_key("https://series.naver.com/novel/detail.series?productNo=1"), "series-naver-com");
        assert_eq!(domain_key("https://www.ridibooks.com/books/123"), "ridibooks-com");
        assert_eq!(domain_key("https://my--odd.host.example/"), "my-odd-host-example");
    }

    #[test]
    fn source_path_drops_query() {
        assert_eq!(source_path("https://cdn.x.com/Covers/A.JPG?type=m"), "/covers/a.jpg");
        assert_eq!(source_path("/thumb/a.png?x=1"), "/thumb/a.png");
    }
}
