/// Computes the relative path from a directory to a file
///
/// Both arguments are `/`-separated paths relative to the same root. Empty
/// segments are ignored, so `""` denotes the root itself.
///
/// # Examples
///
/// ```
/// use doc_mirror::url::relative_path;
///
/// assert_eq!(relative_path("guides", "api/foo.md"), "../api/foo.md");
/// assert_eq!(relative_path("guides", "guides/bar.md"), "bar.md");
/// assert_eq!(relative_path("", "api/foo.md"), "api/foo.md");
/// ```
pub fn relative_path(from_dir: &str, to_file: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to_file.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat("..").take(from.len() - common));
    parts.extend(&to[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Returns the directory part of a `/`-separated relative path
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_directory() {
        assert_eq!(relative_path("guides", "api/foo.md"), "../api/foo.md");
    }

    #[test]
    fn test_same_directory() {
        assert_eq!(relative_path("api", "api/_Pipe.md"), "_Pipe.md");
    }

    #[test]
    fn test_deeper_source() {
        assert_eq!(relative_path("a/b/c", "a/x.md"), "../../x.md");
    }

    #[test]
    fn test_from_root() {
        assert_eq!(relative_path("", "guides/intro.md"), "guides/intro.md");
    }

    #[test]
    fn test_to_root_file() {
        assert_eq!(relative_path("api", ".md"), "../.md");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("guides/bar.md"), "guides");
        assert_eq!(parent_dir("a/b/c.md"), "a/b");
        assert_eq!(parent_dir("index.md"), "");
    }
}
