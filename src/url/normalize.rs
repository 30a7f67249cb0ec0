use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used as a visited-set key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Parsing already lowercases the host, drops default ports, removes dot
/// segments and turns an empty path into `/`. Query strings are kept as-is,
/// since they usually select different content.
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.test:80/a/../about#team").unwrap();
/// assert_eq!(url.as_str(), "http://example.test/about");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Prefixes `https://` when the input carries neither `http://` nor `https://`
///
/// This is what the interactive shell does with whatever the user typed
/// before handing the seed to the crawler.
pub fn with_default_scheme(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
