//! Path joining for document-relative hrefs
//!
//! Resolution follows RFC 3986 merge-and-normalize semantics: the href is
//! merged onto the parent path's directory and `.`/`..` segments are
//! collapsed, never climbing above the root.

/// Merges a document-relative reference onto a parent path
///
/// The parent path is cut back to its directory (everything up to and
/// including the last `/`, queries and fragments excluded) and the
/// reference is appended, then dot segments are removed. A query or
/// fragment carried by the reference survives untouched.
///
/// # Arguments
///
/// * `parent_path` - The path of the page the href was found on
/// * `reference` - The raw document-relative href
pub fn merge_paths(parent_path: &str, reference: &str) -> String {
    // Split the reference into its path part and a query/fragment suffix;
    // dot-segment removal applies only to the path part.
    let suffix_at = reference.find(['?', '#']).unwrap_or(reference.len());
    let (ref_path, suffix) = reference.split_at(suffix_at);

    let dir = parent_directory(parent_path);
    let joined = format!("{}{}", dir, ref_path);
    let mut resolved = remove_dot_segments(&joined);
    resolved.push_str(suffix);
    resolved
}

/// Returns the directory portion of a path, up to and including the last `/`
///
/// Any query or fragment on the parent path is discarded first, since a
/// relative reference resolves against the document's path alone.
fn parent_directory(parent_path: &str) -> &str {
    let path_end = parent_path.find(['?', '#']).unwrap_or(parent_path.len());
    let path_only = &parent_path[..path_end];

    match path_only.rfind('/') {
        Some(idx) => &path_only[..=idx],
        None => "/",
    }
}

/// Removes `.` and `..` segments from an absolute path
///
/// Duplicate slashes collapse, `..` pops at most back to the root, and a
/// trailing slash on the input is preserved so `dir/` stays distinct from
/// `dir`.
pub fn remove_dot_segments(path: &str) -> String {
    let keep_trailing = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut result = format!("/{}", segments.join("/"));
    if keep_trailing {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sibling_document() {
        assert_eq!(merge_paths("/a/b.html", "c.html"), "/a/c.html");
    }

    #[test]
    fn test_merge_from_root_page() {
        assert_eq!(merge_paths("/", "page.html"), "/page.html");
    }

    #[test]
    fn test_merge_parent_directory() {
        assert_eq!(merge_paths("/a/b/c.html", "../d.html"), "/a/d.html");
    }

    #[test]
    fn test_merge_double_parent() {
        assert_eq!(merge_paths("/a/b/c.html", "../../d.html"), "/d.html");
    }

    #[test]
    fn test_merge_never_escapes_root() {
        assert_eq!(merge_paths("/a.html", "../../../x.html"), "/x.html");
    }

    #[test]
    fn test_merge_current_directory() {
        assert_eq!(merge_paths("/a/b.html", "./c.html"), "/a/c.html");
    }

    #[test]
    fn test_merge_keeps_reference_query() {
        assert_eq!(merge_paths("/a/b.html", "c.html?x=1"), "/a/c.html?x=1");
    }

    #[test]
    fn test_merge_drops_parent_query() {
        assert_eq!(merge_paths("/a/b.html?old=1", "c.html"), "/a/c.html");
    }

    #[test]
    fn test_merge_subdirectory() {
        assert_eq!(merge_paths("/docs/", "guide/intro.html"), "/docs/guide/intro.html");
    }

    #[test]
    fn test_remove_dot_segments_plain() {
        assert_eq!(remove_dot_segments("/a/b/c"), "/a/b/c");
    }

    #[test]
    fn test_remove_dot_segments_collapses_duplicates() {
        assert_eq!(remove_dot_segments("/a//b///c"), "/a/b/c");
    }

    #[test]
    fn test_remove_dot_segments_trailing_slash_preserved() {
        assert_eq!(remove_dot_segments("/a/b/"), "/a/b/");
    }

    #[test]
    fn test_remove_dot_segments_empty_is_root() {
        assert_eq!(remove_dot_segments(""), "/");
        assert_eq!(remove_dot_segments("/"), "/");
    }

    #[test]
    fn test_remove_dot_segments_parent_at_root() {
        assert_eq!(remove_dot_segments("/../x"), "/x");
    }

    #[test]
    fn test_remove_dot_segments_trailing_parent() {
        assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
    }
}
