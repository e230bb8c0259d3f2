use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone as _, Utc};
use mdsite::build::SiteBuilder;
use mdsite::config::SiteConfig;

fn write(root: &Path, rel: &str, contents: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn list_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            files.push(path.strip_prefix(dir)?.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn read_all(dir: &Path) -> anyhow::Result<Vec<(PathBuf, Vec<u8>)>> {
    let mut contents = Vec::new();
    for rel in list_files(dir)? {
        let bytes = fs::read(dir.join(&rel))?;
        contents.push((rel, bytes));
    }
    Ok(contents)
}

fn sample_source(root: &Path) -> anyhow::Result<()> {
    write(
        root,
        "SUMMARY.md",
        "# Summary\n\n* [Overview](overview.md)\n\n## Guides\n\n* [Intro](guides/intro.md)\n* [Setup](guides/setup.md)\n* [Missing](guides/missing.md)\n\n---\n\n## Reference\n\n* [API](reference/api.md)\n",
    )?;
    write(root, "README.md", "# Welcome\n\nStart with the [intro](guides/intro.md).\n")?;
    write(root, "overview.md", "# Overview\n\nBig picture.\n")?;
    write(
        root,
        "guides/intro.md",
        "---\ntitle: Intro\n---\n\n# Intro\n\n## Install\n\nRun it.\n\n## Usage\n\nSee [setup](setup.md).\n",
    )?;
    write(root, "guides/setup.md", "# Setup\n\n```sh\nmdsite docs\n```\n")?;
    write(root, "reference/api.md", "# API\n\n| a | b |\n|---|---|\n| 1 | 2 |\n")?;
    Ok(())
}

fn builder(source: &Path, out: &Path, config: SiteConfig) -> SiteBuilder {
    let built_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    SiteBuilder::new(source.to_path_buf(), out.to_path_buf(), config).with_built_at(built_at)
}

#[test]
fn build_writes_pages_mirroring_source_layout() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    sample_source(&source)?;

    builder(&source, &out, SiteConfig::default()).build()?;

    assert_eq!(
        list_files(&out)?,
        vec![
            PathBuf::from("assets/highlight.css"),
            PathBuf::from("assets/script.js"),
            PathBuf::from("assets/style.css"),
            PathBuf::from("guides/intro.html"),
            PathBuf::from("guides/setup.html"),
            PathBuf::from("index.html"),
            PathBuf::from("overview.html"),
            PathBuf::from("reference/api.html"),
        ]
    );

    let intro = fs::read_to_string(out.join("guides/intro.html"))?;
    assert!(intro.contains("<title>Intro - Documentation</title>"));
    assert!(intro.contains("href=\"../assets/style.css\""));
    assert!(intro.contains(
        "<li class=\"nav-page active\"><a href=\"../guides/intro.html\" aria-current=\"page\">Intro</a></li>"
    ));
    assert_eq!(intro.matches("nav-page active").count(), 1);
    assert!(intro.contains("<a href=\"../guides/missing.html\">Missing</a>"));
    assert!(intro.contains("<a href=\"#install\">Install</a>"));
    assert!(intro.contains("href=\"setup.html\""));
    assert!(intro.contains("<a class=\"prev\" href=\"../overview.html\">&larr; Overview</a>"));
    assert!(intro.contains("<a class=\"next\" href=\"../guides/setup.html\">Setup &rarr;</a>"));
    assert!(intro.contains("Built 2026-01-02T03:04:05Z"));
    assert!(!intro.contains("title: Intro"));

    let index = fs::read_to_string(out.join("index.html"))?;
    assert!(index.contains("<h1 id=\"welcome\">Welcome</h1>"));
    assert!(index.contains("href=\"guides/intro.html\""));
    assert!(!index.contains("nav-page active"));
    assert!(index.contains("<a class=\"next\" href=\"overview.html\">Overview &rarr;</a>"));

    let setup = fs::read_to_string(out.join("guides/setup.html"))?;
    assert!(setup.contains("<a class=\"next\" href=\"../reference/api.html\">API &rarr;</a>"));
    Ok(())
}

#[test]
fn rebuild_is_byte_identical_and_clears_stale_files() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    sample_source(&source)?;
    let config = SiteConfig {
        site_url: Some("https://docs.example.org/".to_owned()),
        ..SiteConfig::default()
    };

    builder(&source, &out, config.clone()).build()?;
    let first = read_all(&out)?;
    write(&out, "stale.html", "left over")?;

    builder(&source, &out, config).build()?;
    let second = read_all(&out)?;

    assert!(first.iter().any(|(path, _)| path == Path::new("sitemap.xml")));
    assert!(first.iter().any(|(path, _)| path == Path::new("index.html")));
    assert_eq!(first, second);
    assert!(!out.join("stale.html").exists());
    Ok(())
}

#[test]
fn missing_manifest_leaves_output_untouched() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    write(&source, "README.md", "# Home\n")?;
    write(&out, "keep.txt", "manual")?;

    let err = builder(&source, &out, SiteConfig::default())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("manifest not found"));
    assert_eq!(list_files(&out)?, vec![PathBuf::from("keep.txt")]);
    Ok(())
}

#[test]
fn home_page_is_rendered_without_manifest_reference() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    write(&source, "SUMMARY.md", "* [Only](only.md)\n")?;
    write(&source, "readme.md", "# Lowercase home\n")?;
    write(&source, "only.md", "# Only\n")?;

    let config = SiteConfig {
        title: "Handbook".to_owned(),
        ..SiteConfig::default()
    };
    builder(&source, &out, config).build()?;

    let index = fs::read_to_string(out.join("index.html"))?;
    assert!(index.contains("<title>Handbook</title>"));
    assert!(index.contains("Lowercase home"));
    assert!(out.join("only.html").is_file());
    Ok(())
}

#[test]
fn nojekyll_marker_and_sitemap_are_emitted() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    sample_source(&source)?;
    write(&source, ".nojekyll", "")?;

    let config = SiteConfig {
        site_url: Some("https://docs.example.org/handbook".to_owned()),
        ..SiteConfig::default()
    };
    builder(&source, &out, config).build()?;

    assert!(out.join(".nojekyll").is_file());
    let sitemap = fs::read_to_string(out.join("sitemap.xml"))?;
    assert!(sitemap.contains("<loc>https://docs.example.org/handbook/</loc>"));
    assert!(sitemap.contains("<loc>https://docs.example.org/handbook/guides/intro.html</loc>"));
    assert!(!sitemap.contains("missing.html"));
    assert_eq!(sitemap.matches("<url>").count(), 5);
    Ok(())
}

#[test]
fn pages_outside_source_root_are_skipped() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    write(&source, "SUMMARY.md", "* [Escape](../outside.md)\n* [Inside](inside.md)\n")?;
    write(temp.path(), "outside.md", "# Outside\n")?;
    write(&source, "inside.md", "# Inside\n")?;

    builder(&source, &out, SiteConfig::default()).build()?;

    assert!(out.join("inside.html").is_file());
    assert!(!temp.path().join("outside.html").exists());
    Ok(())
}

#[test]
fn refuses_output_directory_that_contains_sources() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    write(&source, "SUMMARY.md", "* [A](a.md)\n")?;
    write(&source, "a.md", "# A\n")?;

    let err = builder(&source, temp.path(), SiteConfig::default())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("would delete the source root"));
    assert!(source.join("a.md").is_file());
    Ok(())
}

#[test]
fn refuses_output_directory_holding_a_listed_page() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    write(&source, "SUMMARY.md", "* [G](guides/g.md)\n")?;
    write(&source, "guides/g.md", "# G\n")?;

    let err = builder(&source, &source.join("guides"), SiteConfig::default())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("would delete page source"));
    assert!(source.join("guides/g.md").is_file());
    Ok(())
}

#[test]
fn invalid_site_url_leaves_output_untouched() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    write(&source, "SUMMARY.md", "* [A](a.md)\n")?;
    write(&source, "a.md", "# A\n")?;
    write(&out, "keep.txt", "manual")?;

    let config = SiteConfig {
        site_url: Some("not a url".to_owned()),
        ..SiteConfig::default()
    };
    let err = builder(&source, &out, config).build().unwrap_err();

    assert!(format!("{err:#}").contains("site_url"));
    assert_eq!(list_files(&out)?, vec![PathBuf::from("keep.txt")]);
    Ok(())
}

#[test]
fn dot_prefixed_top_level_page_keeps_top_level_priority() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let source = temp.path().join("docs");
    let out = temp.path().join("site");
    write(&source, "SUMMARY.md", "* [A](./a.md)\n* [B](guides/b.md)\n")?;
    write(&source, "a.md", "# A\n")?;
    write(&source, "guides/b.md", "# B\n")?;

    let config = SiteConfig {
        site_url: Some("https://x.org/d".to_owned()),
        ..SiteConfig::default()
    };
    builder(&source, &out, config).build()?;

    let sitemap = fs::read_to_string(out.join("sitemap.xml"))?;
    assert!(sitemap.contains(concat!(
        "<loc>https://x.org/d/a.html</loc>\n",
        "    <lastmod>2026-01-02T03:04:05Z</lastmod>\n",
        "    <changefreq>monthly</changefreq>\n",
        "    <priority>0.7</priority>",
    )));
    assert!(sitemap.contains("<loc>https://x.org/d/guides/b.html</loc>"));
    assert!(!sitemap.contains("./a.html"));
    Ok(())
}
