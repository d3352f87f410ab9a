//! URL splitting and canonicalisation.
//!
//! `normalize_url` produces the comparison key used for duplicate
//! detection: `http` and `https` are treated as the same scheme, the host
//! is lower-cased, one trailing path slash is dropped (except for the bare
//! root `/`) and the fragment is discarded. The query string is preserved.
//! Input that does not split into a scheme is returned unchanged.

/// Upper bound on accepted record URL length.
pub const MAX_URL_LEN: usize = 2083;

/// The five components of a URL, borrowed from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub netloc: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Split `url` into components. Returns `None` when no valid scheme
    /// prefix is present.
    pub fn parse(url: &'a str) -> Option<Self> {
        let (scheme, mut rest) = url.split_once(':')?;
        let mut chars = scheme.chars();
        let first = chars.next()?;
        if !first.is_ascii_alphabetic()
            || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return None;
        }

        let netloc = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(['/', '?', '#']).unwrap_or(after.len());
                rest = &after[end..];
                Some(&after[..end])
            }
            None => None,
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, frag)) => (before, Some(frag)),
            None => (rest, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((before, q)) => (before, Some(q)),
            None => (rest, None),
        };

        Some(UrlParts {
            scheme,
            netloc,
            path,
            query,
            fragment,
        })
    }

    /// Host portion of the authority, without userinfo or port.
    pub fn host(&self) -> Option<&'a str> {
        let netloc = self.netloc?;
        let host_port = netloc.rsplit_once('@').map_or(netloc, |(_, h)| h);
        if let Some(bracketed) = host_port.strip_prefix('[') {
            return bracketed.split_once(']').map(|(h, _)| h);
        }
        Some(host_port.split_once(':').map_or(host_port, |(h, _)| h))
    }

    pub fn is_http(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("http") || self.scheme.eq_ignore_ascii_case("https")
    }
}

/// Produce the duplicate-detection key for `url`.
pub fn normalize_url(url: &str) -> String {
    let Some(parts) = UrlParts::parse(url) else {
        return url.to_string();
    };

    let scheme = if parts.is_http() {
        "https".to_string()
    } else {
        parts.scheme.to_ascii_lowercase()
    };

    let path = if parts.path == "/" {
        parts.path
    } else {
        parts.path.strip_suffix('/').unwrap_or(parts.path)
    };

    let mut out = String::with_capacity(url.len());
    out.push_str(&scheme);
    out.push(':');
    if let Some(netloc) = parts.netloc.filter(|n| !n.is_empty()) {
        out.push_str("//");
        out.push_str(&lowercase_host(netloc));
        if !path.is_empty() && !path.starts_with('/') {
            out.push('/');
        }
    }
    out.push_str(path);
    if let Some(query) = parts.query.filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    out
}

fn lowercase_host(netloc: &str) -> String {
    match netloc.rsplit_once('@') {
        Some((userinfo, host)) => format!("{userinfo}@{}", host.to_lowercase()),
        None => netloc.to_lowercase(),
    }
}

/// Whether `url` is an absolute http(s) URL with a non-empty host.
pub fn is_http_url(url: &str) -> bool {
    if url.len() > MAX_URL_LEN || url.chars().any(char::is_whitespace) {
        return false;
    }
    match UrlParts::parse(url) {
        Some(parts) => parts.is_http() && parts.host().is_some_and(|h| !h.is_empty()),
        None => false,
    }
}

/// Raw authority of `url` (`host[:port]`), used to key per-host state.
pub fn netloc_of(url: &str) -> String {
    UrlParts::parse(url)
        .and_then(|p| p.netloc)
        .unwrap_or_default()
        .to_string()
}
