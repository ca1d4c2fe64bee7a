//! Layout identity resolution
//!
//! Every document gets a directory-local default layout: `index.html` for
//! `index.md` and `readme.md`, `page.html` for everything else. Front
//! matter can override the whole identity through the `layout` key.

/// Template file suffix.
pub const TPL_SUFFIX: &str = ".html";

/// Compute the convention layout identity for a content path.
///
/// The base name is compared case-insensitively, so `README.md` and
/// `Index.MD` both map to the `index` convention.
pub fn match_layout(name: &str) -> String {
    let (dir, base) = match name.rfind('/') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("", name),
    };
    let dir = dir.trim_start_matches('/');

    let base = base.to_lowercase();
    let tpl = if base == "index.md" || base == "readme.md" {
        "index"
    } else {
        "page"
    };

    if dir.is_empty() {
        format!("{}{}", tpl, TPL_SUFFIX)
    } else {
        format!("{}/{}{}", dir, tpl, TPL_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_convention() {
        assert_eq!(match_layout("/index.md"), "index.html");
        assert_eq!(match_layout("/readme.md"), "index.html");
        assert_eq!(match_layout("/README.md"), "index.html");
        assert_eq!(match_layout("/docs/Index.MD"), "docs/index.html");
    }

    #[test]
    fn test_page_convention() {
        assert_eq!(match_layout("/about.md"), "page.html");
        assert_eq!(match_layout("/blog/first-post.md"), "blog/page.html");
        assert_eq!(match_layout("/a/b/c.md"), "a/b/page.html");
    }

    #[test]
    fn test_non_markdown_names_use_page() {
        assert_eq!(match_layout("/missing.html"), "page.html");
    }
}
