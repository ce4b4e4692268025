use crate::KensakuError;
use url::Url;

/// Returns the site key of a URL: its lowercase host plus `:port` when the URL
/// carries an explicit, non-default port
///
/// Returns `None` for URLs without a host (`mailto:`, `data:` ...).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kensaku::url::site_of;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(site_of(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(site_of(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn site_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Parses a seed URL and returns it in serialized form together with its site key
///
/// The serialized form is what discovered links resolve to, so a seed typed
/// as `http://host` becomes `http://host/`.
///
/// # Examples
///
/// ```
/// use kensaku::url::canonical_seed;
///
/// let (seed, site) = canonical_seed("http://Example.com").unwrap();
/// assert_eq!(seed, "http://example.com/");
/// assert_eq!(site, "example.com");
/// ```
pub fn canonical_seed(link: &str) -> Result<(String, String), KensakuError> {
    let url = Url::parse(link)
        .map_err(|e| KensakuError::InvalidUrl(format!("{}: {}", link, e)))?;

    let site = site_of(&url)
        .ok_or_else(|| KensakuError::InvalidUrl(format!("{}: missing host", link)))?;
    Ok((url.into(), site))
}
