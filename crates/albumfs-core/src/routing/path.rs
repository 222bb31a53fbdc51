//! Virtual path normalization.
//!
//! Virtual paths are `/`-separated strings with no leading or trailing
//! separator; the empty string is the root. These helpers are purely
//! lexical and never touch the disk.

/// Strip leading and trailing separators.
pub fn trim_separators(path: &str) -> &str {
    path.trim_matches('/')
}

/// Lexically clean a path.
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against the preceding segment. A `..` with nothing left to pop is kept,
/// so a path that climbs above its start stays detectable.
///
/// ```
/// use albumfs_core::routing::path::clean;
///
/// assert_eq!(clean("/album//Vacation/./img1.jpg/"), "album/Vacation/img1.jpg");
/// assert_eq!(clean("album/Vacation/.."), "album");
/// assert_eq!(clean("../album"), "../album");
/// assert_eq!(clean("."), "");
/// ```
pub fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Join a root and a relative path, then clean the result.
pub fn join(root: &str, rel: &str) -> String {
    match (root.is_empty(), rel.is_empty()) {
        (true, _) => clean(rel),
        (false, true) => clean(root),
        (false, false) => clean(&format!("{root}/{rel}")),
    }
}

/// Normalize a configured mount root. `"/"` and `"."` become the empty root.
pub fn normalize_root(root: &str) -> String {
    clean(root)
}

/// Returns true if `path` is `root` itself or lies below it.
///
/// Both arguments must already be cleaned.
pub fn is_within(root: &str, path: &str) -> bool {
    if root.is_empty() {
        return path != ".." && !path.starts_with("../");
    }
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Split a cleaned path into its parent and last segment.
///
/// ```
/// use albumfs_core::routing::path::split_leaf;
///
/// assert_eq!(split_leaf("album/Vacation/img1.jpg"), ("album/Vacation", "img1.jpg"));
/// assert_eq!(split_leaf("album"), ("", "album"));
/// ```
pub fn split_leaf(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Last segment of a path.
pub fn leaf(path: &str) -> &str {
    split_leaf(trim_separators(path)).1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_separators() {
        assert_eq!(trim_separators("/album/"), "album");
        assert_eq!(trim_separators("///"), "");
        assert_eq!(trim_separators("album/Vacation"), "album/Vacation");
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("/"), "");
        assert_eq!(clean("a//b"), "a/b");
        assert_eq!(clean("a/./b/"), "a/b");
        assert_eq!(clean("a/b/../c"), "a/c");
        assert_eq!(clean("a/../.."), "..");
        assert_eq!(clean("../../a"), "../../a");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", ""), "");
        assert_eq!(join("", "album"), "album");
        assert_eq!(join("album", ""), "album");
        assert_eq!(join("album", "Vacation/img1.jpg"), "album/Vacation/img1.jpg");
        assert_eq!(join("album/Vacation", ".."), "album");
        assert_eq!(join("album", "../../etc"), "../etc");
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("", ""));
        assert!(is_within("", "album"));
        assert!(!is_within("", ".."));
        assert!(!is_within("", "../album"));
        assert!(is_within("album", "album"));
        assert!(is_within("album", "album/Vacation"));
        assert!(!is_within("album", "albums"));
        assert!(!is_within("album", "playlist"));
    }

    #[test]
    fn test_leaf() {
        assert_eq!(leaf("album/Vacation/img1.jpg"), "img1.jpg");
        assert_eq!(leaf("/album/"), "album");
        assert_eq!(leaf(""), "");
    }
}
