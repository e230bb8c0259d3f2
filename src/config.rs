use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "book.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Value of `<html lang>`.
    pub language: String,
    /// Absolute base URL of the published site; enables `sitemap.xml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            description: String::new(),
            author: String::new(),
            language: "en".to_owned(),
            site_url: None,
        }
    }
}

impl SiteConfig {
    /// Loads `book.json`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config: SiteConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parse config: {}", path.display()))?;
        Ok(config)
    }
}
