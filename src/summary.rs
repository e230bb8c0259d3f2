use std::path::Path;

use anyhow::Context as _;

use crate::formats::{NavigationEntry, PageRef};

pub const SUMMARY_FILE: &str = "SUMMARY.md";

pub fn read_summary(path: &Path) -> anyhow::Result<Vec<NavigationEntry>> {
    if !path.is_file() {
        anyhow::bail!("manifest not found: {}", path.display());
    }
    let summary_md = std::fs::read_to_string(path)
        .with_context(|| format!("read SUMMARY.md: {}", path.display()))?;
    Ok(parse_summary(&summary_md))
}

pub fn parse_summary(summary_md: &str) -> Vec<NavigationEntry> {
    let (entries, _) = summary_md.lines().map(str::trim).fold(
        (Vec::new(), None::<usize>),
        |(mut entries, current), line| {
            if is_section_heading(line) {
                let title = line.trim_start_matches('#').trim();
                entries.push(NavigationEntry::section(title, Vec::new()));
                let current = Some(entries.len() - 1);
                return (entries, current);
            }
            if line.starts_with('#') || line == "---" {
                return (entries, current);
            }
            let Some((title, path)) = parse_bullet_link(line) else {
                return (entries, current);
            };

            let page = NavigationEntry::page(title, path);
            match current.and_then(|idx| entries.get_mut(idx)) {
                Some(NavigationEntry::Section { items, .. }) => items.push(page),
                _ => entries.push(page),
            }
            (entries, current)
        },
    );
    entries
}

/// Depth-first list of every page in manifest order.
pub fn flatten_pages(entries: &[NavigationEntry]) -> Vec<PageRef<'_>> {
    let mut pages = Vec::new();
    collect_pages(entries, &mut pages);
    pages
}

fn collect_pages<'a>(entries: &'a [NavigationEntry], out: &mut Vec<PageRef<'a>>) {
    for entry in entries {
        match entry {
            NavigationEntry::Section { items, .. } => collect_pages(items, out),
            NavigationEntry::Page { title, path } => out.push(PageRef {
                title: title.as_str(),
                path: path.as_str(),
            }),
        }
    }
}

fn is_section_heading(line: &str) -> bool {
    line.starts_with("##") && !line.starts_with("###")
}

// `* [title](path)`, also accepting `-` and `+` bullets.
fn parse_bullet_link(line: &str) -> Option<(&str, &str)> {
    let rest = line
        .strip_prefix('*')
        .or_else(|| line.strip_prefix('-'))
        .or_else(|| line.strip_prefix('+'))?;
    let rest = rest.trim_start().strip_prefix('[')?;
    let (title, rest) = rest.split_once("](")?;
    let (path, _) = rest.split_once(')')?;
    Some((title.trim(), path.trim()))
}
