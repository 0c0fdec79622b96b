//! URL resolution for raw hrefs
//!
//! Turns an href found on a page — absolute, protocol-relative,
//! domain-relative, or document-relative — into a canonical absolute URL in
//! the context of its parent page. This is the crawl's single URL
//! constructor: there is one precedence table and no special-casing at the
//! call sites.

mod path;

use crate::ResolveError;
use std::fmt;

pub use path::remove_dot_segments;

/// A fully resolved URL as a `{protocol, domain, path}` triple
///
/// Invariants: `path` always begins with `/`; `protocol` is `http://` or
/// `https://`; `domain` never contains a path component. Values are
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedUrl {
    protocol: String,
    domain: String,
    path: String,
}

impl ResolvedUrl {
    fn new(protocol: impl Into<String>, domain: impl Into<String>, path: String) -> Self {
        let path = if path.is_empty() { "/".to_string() } else { path };
        Self {
            protocol: protocol.into(),
            domain: domain.into(),
            path,
        }
    }

    /// The scheme including separator, e.g. `https://`
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The lowercased host (and port, if any)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The path, always starting with `/`; query and fragment included
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The full address: protocol + domain + path
    pub fn full_address(&self) -> String {
        format!("{}{}{}", self.protocol, self.domain, self.path)
    }

    /// The deduplication key: domain + path, protocol ignored
    ///
    /// `http://` and `https://` variants of the same page share one key.
    pub fn canonical_key(&self) -> String {
        format!("{}{}", self.domain, self.path)
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.protocol, self.domain, self.path)
    }
}

/// Resolves a raw href against an optional parent URL
///
/// Precedence order:
/// 1. Absolute (`http://` / `https://`): protocol, domain up to the next
///    `/`, remainder as path (defaulting to `/`).
/// 2. Protocol-relative (`//host/path`): protocol inherited from the parent.
/// 3. Domain-relative (`/path`): protocol and domain inherited.
/// 4. Document-relative (anything else): joined onto the parent path's
///    directory with dot segments collapsed.
///
/// An empty href resolves to the parent's own address. Hrefs carrying a
/// non-HTTP scheme (`ftp:`, `file:`, `javascript:`, ...) are rejected with
/// `UnsupportedScheme`; `mailto:` and `tel:` links are expected to be
/// intercepted before resolution is attempted.
///
/// # Arguments
///
/// * `raw` - The href attribute value as found in the document
/// * `parent` - The page the href was found on; `None` only for the seed
///
/// # Errors
///
/// * `EmptyHref` - empty href at the seed (no parent to fall back on)
/// * `MissingContext` - relative href with no parent
/// * `UnsupportedScheme` - non-HTTP scheme
/// * `Malformed` - absolute URL with no host
pub fn resolve(raw: &str, parent: Option<&ResolvedUrl>) -> Result<ResolvedUrl, ResolveError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return match parent {
            Some(p) => Ok(p.clone()),
            None => Err(ResolveError::EmptyHref),
        };
    }

    // 1. Absolute URL
    if let Some((protocol, rest)) = strip_http_protocol(raw) {
        return parse_host_and_path(protocol, rest);
    }

    // 2. Protocol-relative
    if let Some(rest) = raw.strip_prefix("//") {
        let parent = parent.ok_or_else(|| ResolveError::MissingContext(raw.to_string()))?;
        return parse_host_and_path(parent.protocol(), rest);
    }

    // Any other explicit scheme is outside the crawler's reach.
    if let Some(scheme) = leading_scheme(raw) {
        return Err(ResolveError::UnsupportedScheme(scheme.to_string()));
    }

    // 3. Domain-relative
    if raw.starts_with('/') {
        let parent = parent.ok_or_else(|| ResolveError::MissingContext(raw.to_string()))?;
        return Ok(ResolvedUrl::new(
            parent.protocol(),
            parent.domain(),
            raw.to_string(),
        ));
    }

    // 4. Document-relative
    let parent = parent.ok_or_else(|| ResolveError::MissingContext(raw.to_string()))?;
    let path = resolve_document_relative(parent.path(), raw);
    Ok(ResolvedUrl::new(parent.protocol(), parent.domain(), path))
}

/// Splits off a leading `http://` or `https://`, case-insensitively
///
/// Returns the canonical lowercase protocol and the remainder.
fn strip_http_protocol(raw: &str) -> Option<(&'static str, &str)> {
    for protocol in ["https://", "http://"] {
        if raw.len() >= protocol.len() && raw[..protocol.len()].eq_ignore_ascii_case(protocol) {
            return Some((protocol, &raw[protocol.len()..]));
        }
    }
    None
}

/// Parses `host[/path]` into a ResolvedUrl under the given protocol
fn parse_host_and_path(protocol: &str, rest: &str) -> Result<ResolvedUrl, ResolveError> {
    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (host, path) = rest.split_at(host_end);

    if host.is_empty() {
        return Err(ResolveError::Malformed(format!("{}{}", protocol, rest)));
    }

    let path = if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        // Query or fragment directly after the host: anchor it at the root.
        format!("/{}", path)
    };

    Ok(ResolvedUrl::new(protocol, host.to_lowercase(), path))
}

/// Detects an explicit scheme prefix (`mailto:`, `ftp:`, `javascript:`, ...)
fn leading_scheme(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let end = raw.find(|c: char| {
        !(c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
    })?;
    if bytes[end] == b':' {
        Some(&raw[..end])
    } else {
        None
    }
}

/// Resolves a document-relative reference against the parent path
fn resolve_document_relative(parent_path: &str, raw: &str) -> String {
    if let Some(query) = raw.strip_prefix('?') {
        // Query-only reference: same document path, replaced query.
        let base_end = parent_path.find(['?', '#']).unwrap_or(parent_path.len());
        return format!("{}?{}", &parent_path[..base_end], query);
    }

    if let Some(fragment) = raw.strip_prefix('#') {
        // Fragment-only reference: same document. A bare or empty `#`
        // resolves to the parent's own address.
        let base_end = parent_path.find('#').unwrap_or(parent_path.len());
        let base = &parent_path[..base_end];
        return if fragment.is_empty() {
            base.to_string()
        } else {
            format!("{}#{}", base, fragment)
        };
    }

    path::merge_paths(parent_path, raw)
}
