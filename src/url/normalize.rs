use crate::url::domain::site_of;
use crate::KensakuError;
use url::Url;

/// Resolves a raw anchor `href` into an absolute URL on `site`
///
/// # Normalization Steps
///
/// 1. Reject fragment-only links (`#section`)
/// 2. Strip one leading `.`, then one leading `/`
/// 3. Parse what is left
///    - absolute and on another site: reject
///    - absolute and on `site`: returned unchanged
///    - relative, or not parsable at all: becomes `http://<site>/<rest>`
///
/// `site` is a host with an optional `:port`, as produced by [`site_of`].
///
/// # Examples
///
/// ```
/// use kensaku::url::process_url;
///
/// assert_eq!(process_url("./a", "site.com").unwrap(), "http://site.com/a");
/// assert!(process_url("#top", "site.com").is_err());
/// assert!(process_url("http://other.com/a", "site.com").is_err());
/// ```
pub fn process_url(link: &str, site: &str) -> Result<String, KensakuError> {
    if link.starts_with('#') {
        return Err(KensakuError::InvalidUrl(format!(
            "fragment-only link: {}",
            link
        )));
    }

    let link = link.strip_prefix('.').unwrap_or(link);
    let link = link.strip_prefix('/').unwrap_or(link);

    match Url::parse(link) {
        Ok(absolute) => {
            let link_site = site_of(&absolute);
            if link_site.as_deref() != Some(site) {
                return Err(KensakuError::InvalidUrl(format!(
                    "off-site link {} (expected {})",
                    link, site
                )));
            }
            Ok(link.to_string())
        }
        // Anything that does not parse as an absolute URL is synthesized
        // against the site, including input the parser rejects outright.
        Err(_) => Ok(format!("http://{}/{}", site, link)),
    }
}
