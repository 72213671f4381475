//! auth::url
//!
//! Hostname extraction from remote URLs.
//!
//! Remote URLs come in two shapes: with a scheme (`ssh://git@host/repo`,
//! `https://host/repo`) and scp-like (`git@host:owner/repo.git`). The
//! scp-like form is normalized by prefixing `ssh://`, after which both are
//! read the same way: the authority runs up to the first `/`, `?` or `#`,
//! userinfo ends at the last `@`, and a trailing `:port` (or `:path` in
//! the scp-like case) is dropped.

/// Scheme assumed for URLs that carry none.
pub const DEFAULT_SCHEME: &str = "ssh://";

/// Whether `url` starts with `<word>://`.
fn has_scheme(url: &str) -> bool {
    match url.find("://") {
        Some(0) | None => false,
        Some(end) => url[..end]
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_'),
    }
}

/// Lower-cased hostname of a remote URL, or `None` if there is none.
///
/// # Example
///
/// ```
/// use repokit::auth::url::extract_host;
///
/// assert_eq!(extract_host("git@GitHub.com:owner/repo.git").as_deref(), Some("github.com"));
/// assert_eq!(extract_host("ssh://git@host:2222/repo").as_deref(), Some("host"));
/// assert_eq!(extract_host("/invalid/url.value@"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    let normalized;
    let url = if has_scheme(url) {
        url
    } else {
        normalized = format!("{}{}", DEFAULT_SCHEME, url);
        &normalized
    };

    let (_, rest) = url.split_once("://")?;
    let authority = match rest.find(['/', '?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    };
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        let (inner, _) = bracketed.split_once(']')?;
        inner
    } else {
        match host_port.find(':') {
            Some(colon) => &host_port[..colon],
            None => host_port,
        }
    };

    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}
