//! URL classification against the target domain
//!
//! Pure decision logic: given a resolved URL and the crawl's target domain,
//! decide whether it is an internal page, a subdomain, an external
//! "take-away" resource, or a document file. Contact links (`mailto:`,
//! `tel:`) are intercepted from the raw href before resolution is ever
//! attempted. All bookkeeping mutations belong to the crawl loop.

use crate::resolve::ResolvedUrl;

/// File extensions that classify a URL as a document
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Relationship of a resolved URL to the target domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Same domain as the target - crawled
    Internal,
    /// Host ends with `.{target}` - recorded, optionally crawled
    Subdomain,
    /// Any other host - recorded as a take-away resource
    External,
    /// Path ends with a document extension - recorded, never fetched
    Document,
}

impl Category {
    /// Returns true if URLs of this category may enter the frontier
    ///
    /// Subdomain traversal is a configuration choice, passed in by the
    /// caller.
    pub fn is_crawlable(&self, crawl_subdomains: bool) -> bool {
        match self {
            Self::Internal => true,
            Self::Subdomain => crawl_subdomains,
            Self::External | Self::Document => false,
        }
    }
}

/// Kind of contact link found in a raw href
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// `mailto:` link
    Mail,
    /// `tel:` link
    Tel,
}

/// Classifies a resolved URL by its relationship to the target domain
///
/// Rules, in order:
/// 1. Path ends with `.pdf`, `.doc`, or `.docx` (case-insensitive) →
///    `Document` - this takes precedence even on the target domain itself.
/// 2. Domain equals the target exactly → `Internal`.
/// 3. Domain ends with `.{target}` → `Subdomain`.
/// 4. Otherwise → `External`.
///
/// Pure and idempotent; classifying the same input twice yields the same
/// category.
pub fn classify(url: &ResolvedUrl, target_domain: &str) -> Category {
    if has_document_extension(url.path()) {
        return Category::Document;
    }

    if url.domain() == target_domain {
        return Category::Internal;
    }

    let subdomain_suffix = format!(".{}", target_domain);
    if url.domain().ends_with(&subdomain_suffix) {
        return Category::Subdomain;
    }

    Category::External
}

/// Detects `mailto:` and `tel:` hrefs, case-insensitively
///
/// Contact links never reach the resolver: they carry no crawlable address
/// and are recorded straight from the raw string.
pub fn contact_kind(raw: &str) -> Option<ContactKind> {
    let raw = raw.trim();
    if starts_with_ignore_case(raw, "mailto:") {
        Some(ContactKind::Mail)
    } else if starts_with_ignore_case(raw, "tel:") {
        Some(ContactKind::Tel)
    } else {
        None
    }
}

/// Checks whether a path ends in a document extension, ignoring any query
/// or fragment
fn has_document_extension(path: &str) -> bool {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];

    DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| ends_with_ignore_case(path, ext))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;

    fn url(address: &str) -> ResolvedUrl {
        resolve(address, None).unwrap()
    }

    #[test]
    fn test_internal_exact_match() {
        let u = url("https://example.com/page");
        assert_eq!(classify(&u, "example.com"), Category::Internal);
    }

    #[test]
    fn test_subdomain_suffix_match() {
        let u = url("https://docs.example.com/x");
        assert_eq!(classify(&u, "example.com"), Category::Subdomain);
    }

    #[test]
    fn test_nested_subdomain() {
        let u = url("https://a.b.example.com/x");
        assert_eq!(classify(&u, "example.com"), Category::Subdomain);
    }

    #[test]
    fn test_external_domain() {
        let u = url("https://other.org/x");
        assert_eq!(classify(&u, "example.com"), Category::External);
    }

    #[test]
    fn test_lookalike_domain_is_external() {
        // notexample.com must not match as a subdomain of example.com
        let u = url("https://notexample.com/x");
        assert_eq!(classify(&u, "example.com"), Category::External);
    }

    #[test]
    fn test_document_extension() {
        let u = url("https://example.com/report.pdf");
        assert_eq!(classify(&u, "example.com"), Category::Document);
    }

    #[test]
    fn test_document_extension_case_insensitive() {
        let u = url("https://example.com/f.PDF");
        assert_eq!(classify(&u, "example.com"), Category::Document);
    }

    #[test]
    fn test_document_takes_precedence_over_domain() {
        let u = url("https://example.com/handbook.docx");
        assert_eq!(classify(&u, "example.com"), Category::Document);
    }

    #[test]
    fn test_document_on_external_domain() {
        let u = url("https://other.org/paper.doc");
        assert_eq!(classify(&u, "example.com"), Category::Document);
    }

    #[test]
    fn test_document_extension_with_query() {
        let u = url("https://example.com/report.pdf?download=1");
        assert_eq!(classify(&u, "example.com"), Category::Document);
    }

    #[test]
    fn test_non_document_extension() {
        let u = url("https://example.com/page.html");
        assert_eq!(classify(&u, "example.com"), Category::Internal);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let u = url("https://docs.example.com/x");
        let first = classify(&u, "example.com");
        let second = classify(&u, "example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_contact_mailto() {
        assert_eq!(contact_kind("mailto:a@b.com"), Some(ContactKind::Mail));
    }

    #[test]
    fn test_contact_tel() {
        assert_eq!(contact_kind("tel:+1234567890"), Some(ContactKind::Tel));
    }

    #[test]
    fn test_contact_case_insensitive() {
        assert_eq!(contact_kind("MailTo:a@b.com"), Some(ContactKind::Mail));
        assert_eq!(contact_kind("TEL:123"), Some(ContactKind::Tel));
    }

    #[test]
    fn test_contact_plain_href() {
        assert_eq!(contact_kind("/contact"), None);
        assert_eq!(contact_kind("https://example.com/"), None);
    }

    #[test]
    fn test_is_crawlable() {
        assert!(Category::Internal.is_crawlable(false));
        assert!(!Category::Subdomain.is_crawlable(false));
        assert!(Category::Subdomain.is_crawlable(true));
        assert!(!Category::External.is_crawlable(true));
        assert!(!Category::Document.is_crawlable(true));
    }
}
