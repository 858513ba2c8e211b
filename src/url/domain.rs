use url::Url;

/// Extracts the domain (authority) from a URL
///
/// The host is lowercased and the port is kept when the URL carries a
/// non-default one, so root-relative links on `http://localhost:8080/` resolve
/// back to the same server.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase `host` or `host:port`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webtimer::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
