use crate::formats::NavigationEntry;
use crate::html::{escape, html_path};
use crate::summary::flatten_pages;

/// Renders the navigation tree as sidebar markup.
///
/// The first page (depth-first) whose stored path equals `current_path` is
/// marked active; when no page matches, nothing is.
pub fn render_sidebar(
    entries: &[NavigationEntry],
    current_path: &str,
    root_prefix: &str,
) -> String {
    let active = flatten_pages(entries)
        .iter()
        .position(|page| page.path == current_path);

    let mut out = String::new();
    out.push_str("<nav class=\"sidebar-nav\" aria-label=\"Site navigation\">\n");
    let mut page_index = 0;
    render_entries(entries, active, root_prefix, 1, &mut page_index, &mut out);
    out.push_str("</nav>\n");
    out
}

fn render_entries(
    entries: &[NavigationEntry],
    active: Option<usize>,
    root_prefix: &str,
    depth: usize,
    page_index: &mut usize,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}<ul>\n"));
    for entry in entries {
        match entry {
            NavigationEntry::Section { title, items } => {
                out.push_str(&format!(
                    "{indent}  <li class=\"nav-section\">\n{indent}    <span class=\"nav-section-title\">{}</span>\n",
                    escape(title)
                ));
                render_entries(items, active, root_prefix, depth + 2, page_index, out);
                out.push_str(&format!("{indent}  </li>\n"));
            }
            NavigationEntry::Page { title, path } => {
                let href = format!("{root_prefix}{}", html_path(path));
                if active == Some(*page_index) {
                    out.push_str(&format!(
                        "{indent}  <li class=\"nav-page active\"><a href=\"{}\" aria-current=\"page\">{}</a></li>\n",
                        escape(&href),
                        escape(title)
                    ));
                } else {
                    out.push_str(&format!(
                        "{indent}  <li class=\"nav-page\"><a href=\"{}\">{}</a></li>\n",
                        escape(&href),
                        escape(title)
                    ));
                }
                *page_index += 1;
            }
        }
    }
    out.push_str(&format!("{indent}</ul>\n"));
}
