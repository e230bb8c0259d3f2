use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::assets::write_assets;
use crate::cli::BuildArgs;
use crate::config::{CONFIG_FILE, SiteConfig};
use crate::formats::{NavigationEntry, PageRef};
use crate::html::{contained_relative_path, html_path, root_prefix};
use crate::markdown::render_markdown;
use crate::sidebar::render_sidebar;
use crate::sitemap::{SITEMAP_FILE, SitemapEntry, parse_site_url, render_sitemap};
use crate::summary::{SUMMARY_FILE, flatten_pages, read_summary};
use crate::template::{PageContext, PageLink, render_page};

pub const OUTPUT_DIR: &str = "_book";
pub const NOJEKYLL_FILE: &str = ".nojekyll";
const HOME_FILES: [&str; 2] = ["README.md", "readme.md"];

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let source_dir = PathBuf::from(&args.source);
    let out_dir = match &args.out {
        Some(out) => PathBuf::from(out),
        None => source_dir.join(OUTPUT_DIR),
    };
    let config = SiteConfig::load(&source_dir.join(CONFIG_FILE)).context("load config")?;

    SiteBuilder::new(source_dir, out_dir, config).build()
}

/// One full, non-incremental site build.
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    source_dir: PathBuf,
    out_dir: PathBuf,
    config: SiteConfig,
    built_at: DateTime<Utc>,
}

#[derive(Debug)]
struct PageJob<'a> {
    title: &'a str,
    /// Path as written in the manifest; drives the active sidebar entry.
    nav_path: &'a str,
    source: PathBuf,
    output: PathBuf,
    root_prefix: String,
    prev: Option<PageRef<'a>>,
    next: Option<PageRef<'a>>,
}

impl SiteBuilder {
    pub fn new(source_dir: PathBuf, out_dir: PathBuf, config: SiteConfig) -> Self {
        Self {
            source_dir,
            out_dir,
            config,
            built_at: Utc::now(),
        }
    }

    /// Pins the timestamp embedded in pages and the sitemap.
    #[must_use]
    pub fn with_built_at(mut self, built_at: DateTime<Utc>) -> Self {
        self.built_at = built_at;
        self
    }

    pub fn build(&self) -> anyhow::Result<()> {
        let summary_path = self.source_dir.join(SUMMARY_FILE);
        tracing::info!(summary = %summary_path.display(), "build: parse summary");
        let nav = read_summary(&summary_path)?;
        let site_url = self
            .config
            .site_url
            .as_deref()
            .map(parse_site_url)
            .transpose()
            .context("validate config")?;
        let listed = flatten_pages(&nav);

        self.ensure_output_is_disposable(&listed)?;
        tracing::info!(out = %self.out_dir.display(), "build: recreate output");
        recreate_dir(&self.out_dir)?;

        tracing::info!("build: assets");
        write_assets(&self.out_dir).context("write assets")?;

        let pages = self.available_pages(&listed);
        let built_at = self.built_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut sitemap_entries = Vec::new();

        if let Some(home) = self.home_file() {
            tracing::info!(home, "build: home page");
            let job = PageJob {
                title: &self.config.title,
                nav_path: home,
                source: self.source_dir.join(home),
                output: self.out_dir.join("index.html"),
                root_prefix: String::new(),
                prev: None,
                next: pages.iter().copied().find(|page| page.path != home),
            };
            self.render_job(&nav, &job, &built_at)?;
            sitemap_entries.push(SitemapEntry::Home);
        }

        tracing::info!(pages = pages.len(), "build: pages");
        for (idx, page) in pages.iter().enumerate() {
            let Some(rel_path) = contained_relative_path(page.path) else {
                continue;
            };
            let output_rel = rel_path.with_extension("html");
            let job = PageJob {
                title: page.title,
                nav_path: page.path,
                source: self.source_dir.join(&rel_path),
                output: self.out_dir.join(&output_rel),
                root_prefix: root_prefix(page.path),
                prev: idx.checked_sub(1).and_then(|prev| pages.get(prev)).copied(),
                next: pages.get(idx + 1).copied(),
            };
            self.render_job(&nav, &job, &built_at)?;
            sitemap_entries.push(SitemapEntry::Page(
                output_rel.to_string_lossy().replace('\\', "/"),
            ));
        }

        let nojekyll = self.source_dir.join(NOJEKYLL_FILE);
        if nojekyll.is_file() {
            let dest = self.out_dir.join(NOJEKYLL_FILE);
            std::fs::copy(&nojekyll, &dest)
                .with_context(|| format!("copy {}: {}", NOJEKYLL_FILE, dest.display()))?;
        }

        if let Some(site_url) = &site_url {
            let xml = render_sitemap(site_url, &sitemap_entries, &built_at)
                .context("render sitemap")?;
            let path = self.out_dir.join(SITEMAP_FILE);
            std::fs::write(&path, xml)
                .with_context(|| format!("write sitemap: {}", path.display()))?;
        }

        tracing::info!(
            written = sitemap_entries.len(),
            out = %self.out_dir.display(),
            "build complete"
        );
        Ok(())
    }

    // Drops manifest entries that cannot be rendered, warning once for each.
    fn available_pages<'a>(&self, pages: &[PageRef<'a>]) -> Vec<PageRef<'a>> {
        let mut seen = HashSet::new();
        let mut available = Vec::with_capacity(pages.len());
        for page in pages {
            let Some(rel_path) = contained_relative_path(page.path) else {
                tracing::warn!(path = %page.path, "page path leaves the source root; skipping");
                continue;
            };
            if !self.source_dir.join(&rel_path).is_file() {
                tracing::warn!(path = %page.path, "page source not found; skipping");
                continue;
            }
            if !seen.insert(rel_path) {
                tracing::debug!(path = %page.path, "page listed more than once; rendering first entry only");
                continue;
            }
            available.push(*page);
        }
        available
    }

    fn home_file(&self) -> Option<&'static str> {
        HOME_FILES
            .into_iter()
            .find(|name| self.source_dir.join(name).is_file())
    }

    fn render_job(
        &self,
        nav: &[NavigationEntry],
        job: &PageJob<'_>,
        built_at: &str,
    ) -> anyhow::Result<()> {
        let markdown = std::fs::read_to_string(&job.source)
            .with_context(|| format!("read page: {}", job.source.display()))?;
        let rendered = render_markdown(&markdown);
        let sidebar_html = render_sidebar(nav, job.nav_path, &job.root_prefix);

        let html = render_page(&PageContext {
            title: job.title,
            content_html: &rendered.html,
            sidebar_html: &sidebar_html,
            toc: &rendered.toc,
            config: &self.config,
            root_prefix: &job.root_prefix,
            prev: job.prev.map(|page| page_link(page, &job.root_prefix)),
            next: job.next.map(|page| page_link(page, &job.root_prefix)),
            built_at,
        });

        if let Some(parent) = job.output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create page dir: {}", parent.display()))?;
        }
        std::fs::write(&job.output, html)
            .with_context(|| format!("write page: {}", job.output.display()))?;
        tracing::debug!(source = %job.source.display(), output = %job.output.display(), "wrote page");
        Ok(())
    }

    // The output directory is deleted wholesale, so it must not contain the
    // source root, a listed page or the home file.
    fn ensure_output_is_disposable(&self, listed: &[PageRef<'_>]) -> anyhow::Result<()> {
        if !self.out_dir.exists() {
            return Ok(());
        }
        let source = self
            .source_dir
            .canonicalize()
            .with_context(|| format!("resolve source dir: {}", self.source_dir.display()))?;
        let out = self
            .out_dir
            .canonicalize()
            .with_context(|| format!("resolve output dir: {}", self.out_dir.display()))?;
        if source.starts_with(&out) {
            anyhow::bail!(
                "output directory would delete the source root: {}",
                self.out_dir.display()
            );
        }

        let sources = listed
            .iter()
            .filter_map(|page| contained_relative_path(page.path))
            .chain(HOME_FILES.into_iter().map(PathBuf::from));
        for rel_path in sources {
            let Ok(path) = self.source_dir.join(&rel_path).canonicalize() else {
                continue;
            };
            if path.starts_with(&out) {
                anyhow::bail!(
                    "output directory would delete page source: {}",
                    path.display()
                );
            }
        }
        Ok(())
    }
}

fn page_link<'a>(page: PageRef<'a>, root_prefix: &str) -> PageLink<'a> {
    PageLink {
        title: page.title,
        href: format!("{root_prefix}{}", html_path(page.path)),
    }
}

fn recreate_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("remove output dir: {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir: {}", dir.display()))
}
