use anyhow::Context as _;
use url::Url;

use crate::html::escape;

pub const SITEMAP_FILE: &str = "sitemap.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapEntry {
    Home,
    /// Output path relative to the site root, e.g. `guides/intro.html`.
    Page(String),
}

impl SitemapEntry {
    fn change_freq(&self) -> &'static str {
        match self {
            Self::Home => "weekly",
            Self::Page(_) => "monthly",
        }
    }

    fn priority(&self) -> &'static str {
        match self {
            Self::Home => "1.0",
            Self::Page(path) if path.contains('/') => "0.8",
            Self::Page(_) => "0.7",
        }
    }
}

pub fn render_sitemap(
    base: &Url,
    entries: &[SitemapEntry],
    lastmod: &str,
) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for entry in entries {
        let loc = match entry {
            SitemapEntry::Home => base.clone(),
            SitemapEntry::Page(path) => base
                .join(path)
                .with_context(|| format!("join sitemap url: {path}"))?,
        };
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", escape(loc.as_str())));
        out.push_str(&format!("    <lastmod>{}</lastmod>\n", escape(lastmod)));
        out.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_freq()
        ));
        out.push_str(&format!("    <priority>{}</priority>\n", entry.priority()));
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    Ok(out)
}

/// Parses `site_url` into the base every sitemap location is joined onto.
pub fn parse_site_url(site_url: &str) -> anyhow::Result<Url> {
    let trimmed = site_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).with_context(|| format!("parse site_url: {site_url}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("site_url must be http/https: {site_url}");
    }
    Ok(url)
}
