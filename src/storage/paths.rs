use crate::url::Pathname;

/// Derives the store-relative file stem for a pathname
///
/// One trailing `/` is stripped, then every segment that begins with an ASCII
/// upper-case letter is prefixed with `_`. The marker keeps `/api/Pipe/` and
/// `/api/pipe/` apart on case-insensitive filesystems.
///
/// # Examples
///
/// ```
/// use doc_mirror::storage::derived_stem;
/// use doc_mirror::url::Pathname;
///
/// let p = |s: &str| Pathname::parse(s).unwrap();
/// assert_eq!(derived_stem(&p("/guides/introduction/")), "guides/introduction");
/// assert_eq!(derived_stem(&p("/api/ValiError/")), "api/_ValiError");
/// assert_eq!(derived_stem(&p("/")), "");
/// ```
pub fn derived_stem(pathname: &Pathname) -> String {
    let path = pathname.as_str();
    let trimmed = path.strip_suffix('/').unwrap_or(path);

    trimmed
        .split('/')
        .skip(1)
        .map(|segment| {
            if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
                format!("_{}", segment)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Store-relative path of the Markdown file for a pathname
pub fn markdown_file(pathname: &Pathname) -> String {
    format!("{}.md", derived_stem(pathname))
}

/// Store-relative path of the metadata file for a pathname
pub fn meta_file(pathname: &Pathname) -> String {
    format!("{}.json", derived_stem(pathname))
}
