use std::path::Path;

use anyhow::Context as _;

pub const ASSETS_DIR: &str = "assets";

const STYLE_CSS: &str = r##"@charset "utf-8";

:root {
  --bg: #ffffff;
  --fg: #1f2328;
  --muted: #59636e;
  --border: #d1d9e0;
  --accent: #0969da;
  --sidebar-bg: #f6f8fa;
  --code-bg: #f6f8fa;
  --active-bg: #ddf4ff;
}

:root[data-theme="dark"] {
  --bg: #0d1117;
  --fg: #e6edf3;
  --muted: #9198a1;
  --border: #3d444d;
  --accent: #4493f8;
  --sidebar-bg: #151b23;
  --code-bg: #151b23;
  --active-bg: #1f2d3d;
}

@media (prefers-color-scheme: dark) {
  :root:not([data-theme="light"]) {
    --bg: #0d1117;
    --fg: #e6edf3;
    --muted: #9198a1;
    --border: #3d444d;
    --accent: #4493f8;
    --sidebar-bg: #151b23;
    --code-bg: #151b23;
    --active-bg: #1f2d3d;
  }
}

* { box-sizing: border-box; }
html { font-family: system-ui, -apple-system, "Segoe UI", sans-serif; }
body { margin: 0; background: var(--bg); color: var(--fg); line-height: 1.6; }
a { color: var(--accent); text-decoration: none; }
a:hover { text-decoration: underline; }
img { max-width: 100%; height: auto; }

.site-header {
  position: sticky; top: 0; z-index: 10;
  display: flex; align-items: center; gap: 1rem;
  padding: 0.6rem 1.2rem;
  background: var(--bg); border-bottom: 1px solid var(--border);
}
.site-title { font-weight: 600; font-size: 1.1rem; color: var(--fg); }
.search { position: relative; margin-left: auto; }
#search-input {
  width: 16rem; padding: 0.35rem 0.6rem;
  border: 1px solid var(--border); border-radius: 6px;
  background: var(--bg); color: var(--fg);
}
#search-results {
  position: absolute; right: 0; top: 2.4rem; width: 22rem; max-height: 60vh; overflow-y: auto;
  margin: 0; padding: 0.3rem 0; list-style: none;
  background: var(--bg); border: 1px solid var(--border); border-radius: 6px;
}
#search-results li a { display: block; padding: 0.3rem 0.8rem; color: var(--fg); }
#search-results li a:hover { background: var(--active-bg); text-decoration: none; }
#search-results .empty { padding: 0.3rem 0.8rem; color: var(--muted); }
#sidebar-toggle { display: none; }
#sidebar-toggle, #theme-toggle {
  border: 1px solid var(--border); border-radius: 6px; padding: 0.25rem 0.55rem;
  background: var(--bg); color: var(--fg); cursor: pointer;
}

.layout { display: flex; align-items: flex-start; }
.sidebar {
  position: sticky; top: 3.2rem; flex: 0 0 16rem; height: calc(100vh - 3.2rem); overflow-y: auto;
  padding: 1rem; background: var(--sidebar-bg); border-right: 1px solid var(--border);
}
.sidebar ul { list-style: none; margin: 0; padding: 0; }
.sidebar ul ul { padding-left: 0.6rem; }
.nav-section { margin-top: 1rem; }
.nav-section-title { display: block; font-weight: 600; color: var(--muted); font-size: 0.85rem; text-transform: uppercase; }
.nav-page a { display: block; padding: 0.2rem 0.5rem; border-radius: 4px; color: var(--fg); }
.nav-page.active a { background: var(--active-bg); color: var(--accent); font-weight: 600; }

.content { flex: 1 1 auto; min-width: 0; max-width: 52rem; padding: 1.5rem 2.5rem 3rem; }
.content pre, .content code { font-family: ui-monospace, Menlo, Consolas, monospace; font-size: 0.9em; }
.content :not(pre) > code { padding: 0.1em 0.3em; border-radius: 4px; background: var(--code-bg); }
.content pre { overflow-x: auto; padding: 0.75em 1em; border-radius: 6px; background: var(--code-bg); }
.content table { border-collapse: collapse; }
.content th, .content td { padding: 0.4rem 0.8rem; border: 1px solid var(--border); }
.content blockquote { margin: 1em 0; padding: 0 1em; border-left: 4px solid var(--border); color: var(--muted); }
.content dt { font-weight: 600; }
.content dd { margin-left: 1.5rem; }

.admonition, .markdown-alert-note, .markdown-alert-tip, .markdown-alert-important,
.markdown-alert-warning, .markdown-alert-caution {
  margin: 1em 0; padding: 0.6em 1em; border-left: 4px solid var(--accent);
  border-radius: 4px; background: var(--code-bg); color: var(--fg);
}
.admonition-title { margin: 0 0 0.4em; font-weight: 600; }
.admonition.warning, .admonition.caution, .markdown-alert-warning, .markdown-alert-caution { border-left-color: #d29922; }
.admonition.danger, .admonition.error { border-left-color: #cf222e; }
.admonition.tip, .admonition.success, .markdown-alert-tip { border-left-color: #1a7f37; }

.footnote-definition { font-size: 0.9em; color: var(--muted); }

.toc { position: sticky; top: 3.2rem; flex: 0 0 14rem; padding: 1.5rem 1rem; font-size: 0.9rem; }
.toc-title { margin: 0 0 0.5rem; font-weight: 600; }
.toc ul { list-style: none; margin: 0; padding: 0; }
.toc-level-3 { padding-left: 0.8rem; }

.pagination { display: flex; justify-content: space-between; margin-top: 3rem; padding-top: 1rem; border-top: 1px solid var(--border); }
.pagination .next { margin-left: auto; }

.site-footer {
  display: flex; gap: 1rem; justify-content: center;
  padding: 1rem; border-top: 1px solid var(--border); color: var(--muted); font-size: 0.85rem;
}

#back-to-top {
  position: fixed; right: 1.2rem; bottom: 1.2rem; z-index: 10;
  width: 2.4rem; height: 2.4rem; border: 1px solid var(--border); border-radius: 50%;
  background: var(--bg); color: var(--fg); cursor: pointer;
}

@media (max-width: 1100px) { .toc { display: none; } }
@media (max-width: 760px) {
  .layout { flex-direction: column; }
  .sidebar { display: none; position: static; height: auto; width: 100%; border-right: 0; border-bottom: 1px solid var(--border); }
  .sidebar.open { display: block; }
  #sidebar-toggle { display: inline-block; }
  .content { padding: 1rem; }
  #search-input { width: 10rem; }
}
"##;

const SCRIPT_JS: &str = r##"(function () {
  "use strict";

  var STORAGE_KEY = "mdsite-theme";
  var MAX_RESULTS = 10;
  var BACK_TO_TOP_OFFSET = 400;

  function currentTheme() {
    var explicit = document.documentElement.dataset.theme;
    if (explicit) {
      return explicit;
    }
    return window.matchMedia && window.matchMedia("(prefers-color-scheme: dark)").matches
      ? "dark"
      : "light";
  }

  function initThemeToggle() {
    var button = document.getElementById("theme-toggle");
    if (!button) {
      return;
    }
    button.addEventListener("click", function () {
      var next = currentTheme() === "dark" ? "light" : "dark";
      document.documentElement.dataset.theme = next;
      try {
        localStorage.setItem(STORAGE_KEY, next);
      } catch (e) {
        // Storage may be unavailable (private mode, file://).
      }
    });
  }

  function initSidebarToggle() {
    var button = document.getElementById("sidebar-toggle");
    var sidebar = document.getElementById("sidebar");
    if (!button || !sidebar) {
      return;
    }
    button.addEventListener("click", function () {
      var open = sidebar.classList.toggle("open");
      button.setAttribute("aria-expanded", open ? "true" : "false");
    });
  }

  function initBackToTop() {
    var button = document.getElementById("back-to-top");
    if (!button) {
      return;
    }
    function update() {
      button.hidden = window.scrollY < BACK_TO_TOP_OFFSET;
    }
    window.addEventListener("scroll", update, { passive: true });
    button.addEventListener("click", function () {
      window.scrollTo({ top: 0, behavior: "smooth" });
    });
    update();
  }

  function collectEntries() {
    var entries = [];
    document.querySelectorAll(".sidebar-nav a").forEach(function (link) {
      entries.push({ text: link.textContent.trim(), href: link.getAttribute("href") });
    });
    document.querySelectorAll(".content h1[id], .content h2[id], .content h3[id]").forEach(function (heading) {
      entries.push({ text: heading.textContent.trim(), href: "#" + heading.id });
    });
    return entries;
  }

  function initSearch() {
    var input = document.getElementById("search-input");
    var results = document.getElementById("search-results");
    if (!input || !results) {
      return;
    }
    var entries = collectEntries();

    function render(query) {
      results.innerHTML = "";
      if (!query) {
        results.hidden = true;
        return;
      }
      var needle = query.toLowerCase();
      var matches = entries.filter(function (entry) {
        return entry.text.toLowerCase().indexOf(needle) !== -1;
      }).slice(0, MAX_RESULTS);

      if (matches.length === 0) {
        var empty = document.createElement("li");
        empty.className = "empty";
        empty.textContent = "No results";
        results.appendChild(empty);
      }
      matches.forEach(function (entry) {
        var item = document.createElement("li");
        var link = document.createElement("a");
        link.href = entry.href;
        link.textContent = entry.text;
        item.appendChild(link);
        results.appendChild(item);
      });
      results.hidden = false;
    }

    input.addEventListener("input", function () {
      render(input.value.trim());
    });
    input.addEventListener("keydown", function (event) {
      if (event.key === "Escape") {
        input.value = "";
        render("");
        input.blur();
      }
    });
    document.addEventListener("keydown", function (event) {
      if (event.key === "/" && document.activeElement !== input) {
        event.preventDefault();
        input.focus();
      }
    });
  }

  document.addEventListener("DOMContentLoaded", function () {
    initThemeToggle();
    initSidebarToggle();
    initBackToTop();
    initSearch();
  });
})();
"##;

const HIGHLIGHT_CSS: &str = r##"@charset "utf-8";

.highlight pre { line-height: 1.45; }
.highlight code[class*="language-"] { color: #24292f; }
:root[data-theme="dark"] .highlight code[class*="language-"] { color: #c9d1d9; }

.highlight .language-rust,
.highlight .language-toml { color: #953800; }
.highlight .language-shell,
.highlight .language-bash,
.highlight .language-sh,
.highlight .language-console { color: #116329; }
.highlight .language-json,
.highlight .language-yaml { color: #0550ae; }
.highlight .language-diff { color: #6639ba; }

:root[data-theme="dark"] .highlight .language-rust,
:root[data-theme="dark"] .highlight .language-toml { color: #ffa657; }
:root[data-theme="dark"] .highlight .language-shell,
:root[data-theme="dark"] .highlight .language-bash,
:root[data-theme="dark"] .highlight .language-sh,
:root[data-theme="dark"] .highlight .language-console { color: #7ee787; }
:root[data-theme="dark"] .highlight .language-json,
:root[data-theme="dark"] .highlight .language-yaml { color: #79c0ff; }
:root[data-theme="dark"] .highlight .language-diff { color: #d2a8ff; }
"##;

/// Writes the static stylesheet, script and highlighting assets under `<out_dir>/assets`.
pub fn write_assets(out_dir: &Path) -> anyhow::Result<()> {
    let assets_dir = out_dir.join(ASSETS_DIR);
    std::fs::create_dir_all(&assets_dir)
        .with_context(|| format!("create assets dir: {}", assets_dir.display()))?;

    for (name, contents) in [
        ("style.css", STYLE_CSS),
        ("script.js", SCRIPT_JS),
        ("highlight.css", HIGHLIGHT_CSS),
    ] {
        let path = assets_dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("write asset: {}", path.display()))?;
    }

    Ok(())
}
