use std::path::{Component, Path, PathBuf};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `guides/intro.md` -> `guides/intro.html`; a `#fragment` is kept.
pub fn html_path(source_path: &str) -> String {
    let (path, fragment) = match source_path.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (source_path, None),
    };
    let html = Path::new(path)
        .with_extension("html")
        .to_string_lossy()
        .replace('\\', "/");
    match fragment {
        Some(fragment) => format!("{html}#{fragment}"),
        None => html,
    }
}

/// Prefix that leads from the page's output directory back to the site root.
pub fn root_prefix(source_path: &str) -> String {
    let depth = source_path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .count()
        .saturating_sub(1);
    "../".repeat(depth)
}

/// Source-relative path as a `PathBuf`, or `None` when it would escape the root.
/// Any `#fragment` is dropped.
pub fn contained_relative_path(source_path: &str) -> Option<PathBuf> {
    let path = Path::new(source_path.split_once('#').map_or(source_path, |(path, _)| path));
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        return None;
    }
    Some(out)
}

/// Lowercase, dash-separated anchor id.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            slug.push('-');
            last_was_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
