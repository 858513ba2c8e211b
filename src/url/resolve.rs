/// Resolves a link found in markup against the crawl's domain
///
/// # Resolution Rules
///
/// | Link form | Result |
/// |-----------|--------|
/// | `//host/path` | `http://host/path` |
/// | `/path` | `http://<domain>/path` |
/// | anything else | returned unchanged |
///
/// Document-relative paths such as `img/a.png` are passed through untouched
/// and fail later at fetch time.
///
/// # Examples
///
/// ```
/// use webtimer::url::resolve;
///
/// assert_eq!(
///     resolve("//cdn.example.com/a.js", "example.com"),
///     "http://cdn.example.com/a.js"
/// );
/// assert_eq!(resolve("/a.js", "example.com"), "http://example.com/a.js");
/// ```
pub fn resolve(url: &str, domain: &str) -> String {
    if url.starts_with("//") {
        format!("http:{}", url)
    } else if url.starts_with('/') {
        format!("http://{}{}", domain, url)
    } else {
        url.to_string()
    }
}
