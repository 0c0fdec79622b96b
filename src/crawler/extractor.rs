//! Link extraction from HTML bodies
//!
//! Yields the raw `href` attribute values of anchor tags in document
//! order. Resolution against the parent page is deliberately not done
//! here - the resolver owns that - so the crawl loop sees exactly what the
//! page's author wrote.

use crate::ExtractError;
use scraper::{Html, Selector};

/// Extracts the raw hrefs of all `<a href>` tags in a document
///
/// The sequence is finite and in document order, which is what gives each
/// page's links their stable enqueue order. Empty href attributes are kept:
/// the resolver maps them to the parent's own address.
///
/// # Arguments
///
/// * `html` - The HTML body to parse
///
/// # Errors
///
/// `ExtractError::Parse` when the anchor selector itself fails to build;
/// scraper's parser is otherwise tolerant of malformed markup.
pub fn extract_hrefs(html: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);

    let selector = Selector::parse("a[href]")
        .map_err(|e| ExtractError::Parse(format!("anchor selector: {:?}", e)))?;

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect();

    Ok(hrefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_href() {
        let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["/page"]);
    }

    #[test]
    fn test_extract_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/first">1</a>
                <a href="https://other.org/second">2</a>
                <a href="third.html">3</a>
            </body></html>
        "#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["/first", "https://other.org/second", "third.html"]);
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let html = r#"<html><body><a name="top">Anchor</a><a href="/x">X</a></body></html>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["/x"]);
    }

    #[test]
    fn test_raw_hrefs_not_resolved() {
        let html = r#"<html><body><a href="../up.html">Up</a></body></html>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["../up.html"]);
    }

    #[test]
    fn test_mailto_and_tel_kept_raw() {
        // Contact links are the classifier's concern, not the extractor's.
        let html = r#"<html><body>
            <a href="mailto:a@b.com">Mail</a>
            <a href="tel:+123">Call</a>
        </body></html>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["mailto:a@b.com", "tel:+123"]);
    }

    #[test]
    fn test_empty_body() {
        let hrefs = extract_hrefs("<html><body></body></html>").unwrap();
        assert!(hrefs.is_empty());
    }

    #[test]
    fn test_malformed_markup_still_yields_links() {
        let html = r#"<html><body><div><a href="/a">broken<a href="/b">"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["/a", "/b"]);
    }

    #[test]
    fn test_empty_href_kept() {
        let html = r#"<html><body><a href="">self</a></body></html>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec![""]);
    }
}
