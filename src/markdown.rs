use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::formats::{RenderedPage, TocEntry};
use crate::html::{escape, slugify};

pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options.insert(Options::ENABLE_GFM);
    options
}

/// Renders one markdown document. Every call starts from a fresh parser, so
/// footnote numbering and heading ids never carry over between documents.
pub fn render_markdown(markdown: &str) -> RenderedPage {
    let (front_matter, body) = split_front_matter(markdown);
    let source = expand_admonitions(body);
    let parser = Parser::new_ext(&source, parser_options());

    let mut events = Vec::new();
    for event in parser {
        match event {
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => events.push(Event::Start(Tag::Link {
                link_type,
                dest_url: rewrite_markdown_link(dest_url),
                title,
                id,
            })),
            Event::Start(Tag::CodeBlock(kind)) => {
                events.push(Event::Html(CowStr::Borrowed("<div class=\"highlight\">")));
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                events.push(Event::End(TagEnd::CodeBlock));
                events.push(Event::Html(CowStr::Borrowed("</div>\n")));
            }
            other => events.push(other),
        }
    }

    let toc = assign_heading_ids(&mut events);

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    RenderedPage {
        html,
        metadata: parse_front_matter(front_matter),
        toc,
    }
}

fn assign_heading_ids(events: &mut [Event<'_>]) -> Vec<TocEntry> {
    let mut used = HashSet::new();
    let mut toc = Vec::new();

    let mut idx = 0;
    while idx < events.len() {
        let Event::Start(Tag::Heading { level, id, .. }) = &events[idx] else {
            idx += 1;
            continue;
        };
        let level = heading_level(*level);
        let explicit_id = id.as_ref().map(|id| id.to_string());

        let mut title = String::new();
        let mut end = idx + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(text) | Event::Code(text) => title.push_str(text),
                _ => {}
            }
            end += 1;
        }

        let anchor = match explicit_id {
            Some(id) => {
                used.insert(id.clone());
                id
            }
            None => unique_slug(&mut used, &title),
        };
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[idx] {
            *id = Some(CowStr::from(anchor.clone()));
        }
        if matches!(level, 2 | 3) {
            toc.push(TocEntry {
                level,
                id: anchor,
                title: title.trim().to_owned(),
            });
        }

        idx = end + 1;
    }

    toc
}

fn unique_slug(used: &mut HashSet<String>, title: &str) -> String {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut n = 0;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{base}-{n}");
    }
    used.insert(candidate.clone());
    candidate
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// Relative `*.md` links point at pages that are written as `*.html`.
fn rewrite_markdown_link(dest: CowStr<'_>) -> CowStr<'_> {
    if dest.contains("://") || dest.starts_with("mailto:") || dest.starts_with('#') {
        return dest;
    }
    let (path, fragment) = match dest.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (&*dest, None),
    };
    let Some(stem) = path.strip_suffix(".md") else {
        return dest;
    };
    let rewritten = match fragment {
        Some(fragment) => format!("{stem}.html#{fragment}"),
        None => format!("{stem}.html"),
    };
    CowStr::from(rewritten)
}

// Only a block opening on the very first line counts as front matter; later
// `---` lines are ordinary markdown.
fn split_front_matter(markdown: &str) -> (&str, &str) {
    let Some(rest) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return ("", markdown);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return (&rest[..offset], &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    ("", markdown)
}

fn parse_front_matter(yaml: &str) -> BTreeMap<String, String> {
    if yaml.trim().is_empty() {
        return BTreeMap::new();
    }
    let values: BTreeMap<String, serde_yaml::Value> = match serde_yaml::from_str(yaml) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(%err, "ignoring unparsable front matter");
            return BTreeMap::new();
        }
    };

    values
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect()
}

/// Expands `!!! kind "Title"` blocks with indented bodies into admonition divs.
fn expand_admonitions(markdown: &str) -> Cow<'_, str> {
    if !markdown.contains("!!!") {
        return Cow::Borrowed(markdown);
    }

    let lines = markdown.lines().collect::<Vec<_>>();
    let mut out = String::with_capacity(markdown.len());
    let mut fence: Option<&str> = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;

        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        }

        let Some((kind, title)) = fence.is_none().then(|| parse_admonition_header(line)).flatten()
        else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        let mut body = Vec::new();
        while idx < lines.len() {
            let next = lines[idx];
            if next.trim().is_empty() {
                body.push("");
            } else if let Some(rest) = next
                .strip_prefix("    ")
                .or_else(|| next.strip_prefix('\t'))
            {
                body.push(rest);
            } else {
                break;
            }
            idx += 1;
        }
        while body.last() == Some(&"") {
            body.pop();
        }

        out.push_str(&format!(
            "<div class=\"admonition {}\">\n<p class=\"admonition-title\">{}</p>\n\n",
            escape(&kind),
            escape(&title)
        ));
        for body_line in body {
            out.push_str(body_line);
            out.push('\n');
        }
        out.push_str("\n</div>\n\n");
    }

    Cow::Owned(out)
}

fn parse_admonition_header(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("!!!")?.trim();
    let (kind, title) = match rest.split_once(char::is_whitespace) {
        Some((kind, title)) => (kind, Some(title.trim().trim_matches('"'))),
        None => (rest, None),
    };
    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    let kind = kind.to_ascii_lowercase();
    let title = match title {
        Some(title) => title.to_owned(),
        None => {
            let mut chars = kind.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
    };
    Some((kind, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_get_unique_anchor_ids() {
        let page = render_markdown("# Title\n\n## Usage\n\n## Usage\n\n### Notes {#custom}\n");
        assert!(page.html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(page.html.contains("<h2 id=\"usage\">Usage</h2>"));
        assert!(page.html.contains("<h2 id=\"usage-1\">Usage</h2>"));
        assert!(page.html.contains("<h3 id=\"custom\">Notes</h3>"));
        let ids = page.toc.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["usage", "usage-1", "custom"]);
    }

    #[test]
    fn front_matter_is_extracted_and_not_rendered() {
        let page = render_markdown("---\ntitle: Intro\norder: 2\ntags: [a, b]\n---\n\n# Body\n");
        assert_eq!(page.metadata.get("title").map(String::as_str), Some("Intro"));
        assert_eq!(page.metadata.get("order").map(String::as_str), Some("2"));
        assert!(!page.metadata.contains_key("tags"));
        assert!(!page.html.contains("title: Intro"));
    }

    #[test]
    fn dashed_block_after_body_text_stays_visible() {
        let page = render_markdown("# T\n\nIntro.\n\n---\nnote: hidden text\n---\n\nAfter.\n");
        assert!(page.html.contains("hidden text"));
        assert!(page.html.contains("<p>After.</p>"));
        assert!(page.metadata.is_empty());
    }

    #[test]
    fn unterminated_front_matter_is_rendered_as_markdown() {
        let page = render_markdown("---\nJust a rule above.\n");
        assert!(page.metadata.is_empty());
        assert!(page.html.contains("Just a rule above."));
    }

    #[test]
    fn footnote_state_does_not_leak_between_documents() {
        let first = render_markdown("One[^a].\n\n[^a]: first\n");
        let second = render_markdown("Two[^b].\n\n[^b]: second\n");
        assert!(first.html.contains("first"));
        assert!(!second.html.contains("first"));
        assert_eq!(
            first.html.matches("footnote-reference").count(),
            second.html.matches("footnote-reference").count()
        );
    }

    #[test]
    fn soft_breaks_become_line_breaks() {
        let page = render_markdown("line one\nline two\n");
        assert!(page.html.contains("line one<br />"));
    }

    #[test]
    fn fenced_code_keeps_language_class_inside_highlight_div() {
        let page = render_markdown("```rust\nfn main() {}\n```\n");
        assert!(page.html.contains("<div class=\"highlight\">"));
        assert!(page.html.contains("class=\"language-rust\""));
    }

    #[test]
    fn relative_markdown_links_point_at_html() {
        let page = render_markdown(
            "[a](guides/intro.md) [b](setup.md#install) [c](https://example.com/x.md)\n",
        );
        assert!(page.html.contains("href=\"guides/intro.html\""));
        assert!(page.html.contains("href=\"setup.html#install\""));
        assert!(page.html.contains("href=\"https://example.com/x.md\""));
    }

    #[test]
    fn tables_and_definition_lists_render() {
        let page = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\nTerm\n: Definition\n");
        assert!(page.html.contains("<table>"));
        assert!(page.html.contains("<dt>Term</dt>"));
    }

    #[test]
    fn admonitions_expand_outside_code_fences() {
        let md = "!!! warning \"Careful\"\n    Mind the **gap**.\n\nAfter.\n\n```\n!!! note\n```\n";
        let page = render_markdown(md);
        assert!(page.html.contains("<div class=\"admonition warning\">"));
        assert!(page.html.contains("<p class=\"admonition-title\">Careful</p>"));
        assert!(page.html.contains("<strong>gap</strong>"));
        assert!(page.html.contains("<p>After.</p>"));
        assert!(page.html.contains("!!! note"));
        assert_eq!(page.html.matches("admonition-title").count(), 1);
    }

    #[test]
    fn admonition_title_defaults_to_kind() {
        assert_eq!(
            parse_admonition_header("!!! note"),
            Some(("note".to_owned(), "Note".to_owned()))
        );
        assert_eq!(parse_admonition_header("!!!"), None);
    }
}
