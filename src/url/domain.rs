use url::Url;

/// Extracts the network location (`host[:port]`) of a URL
///
/// The host is lowercased. The port is only included when it is explicit
/// and differs from the scheme's default, so `http://example.com:80/` and
/// `http://example.com/` share a network location.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::url::network_location;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(network_location(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(network_location(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns true if the URL lives on exactly the given network location
///
/// Subdomains, `www.` variants and other ports are all out of scope.
pub fn is_in_scope(url: &Url, domain: &str) -> bool {
    network_location(url).as_deref() == Some(domain)
}
