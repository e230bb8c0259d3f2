use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the navigation tree parsed from `SUMMARY.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationEntry {
    Section {
        title: String,
        items: Vec<NavigationEntry>,
    },
    Page {
        title: String,
        /// Source path relative to the source root, verbatim from the manifest.
        path: String,
    },
}

impl NavigationEntry {
    pub fn page(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Page {
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn section(title: impl Into<String>, items: Vec<NavigationEntry>) -> Self {
        Self::Section {
            title: title.into(),
            items,
        }
    }
}

/// Borrowed view of a `NavigationEntry::Page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef<'a> {
    pub title: &'a str,
    pub path: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub html: String,
    /// Scalar front-matter values, stringified.
    pub metadata: BTreeMap<String, String>,
    pub toc: Vec<TocEntry>,
}
