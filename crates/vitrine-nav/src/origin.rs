//! Minimal URL origin handling for menu normalization.

/// Scheme, host, and port of an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Origin {
    /// Parse the origin of an absolute URL. Returns `None` for relative
    /// or unparseable input.
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        if scheme.is_empty() {
            return None;
        }

        let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        if authority.is_empty() {
            return None;
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) if !h.is_empty() => match p.parse() {
                Ok(port) => (h.to_string(), port),
                Err(_) => (authority.to_string(), default_port(scheme)),
            },
            _ => (authority.to_string(), default_port(scheme)),
        };

        Some(Self {
            scheme: scheme.to_lowercase(),
            host: host.to_lowercase(),
            port,
        })
    }

    /// Whether two origins are the same (scheme, host, and port).
    pub fn same_as(&self, other: &Origin) -> bool {
        self == other
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme.to_lowercase().as_str() {
        "http" => 80,
        _ => 443,
    }
}

/// Split an absolute URL into its origin and the rest (path, query,
/// fragment). The rest always starts with `/`.
pub fn split_origin(url: &str) -> Option<(Origin, String)> {
    let origin = Origin::parse(url)?;
    let after_scheme = url.split_once("://")?.1;
    let rest = match after_scheme.find(['/', '?', '#']) {
        Some(idx) if after_scheme.as_bytes()[idx] == b'/' => after_scheme[idx..].to_string(),
        Some(idx) => format!("/{}", &after_scheme[idx..]),
        None => "/".to_string(),
    };
    Some((origin, rest))
}
