use crate::config::SiteConfig;
use crate::formats::TocEntry;
use crate::html::escape;

#[derive(Debug, Clone)]
pub struct PageLink<'a> {
    pub title: &'a str,
    /// Relative to the page being rendered.
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub content_html: &'a str,
    pub sidebar_html: &'a str,
    pub toc: &'a [TocEntry],
    pub config: &'a SiteConfig,
    /// `../` repeated once per directory level of the page.
    pub root_prefix: &'a str,
    pub prev: Option<PageLink<'a>>,
    pub next: Option<PageLink<'a>>,
    pub built_at: &'a str,
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let config = ctx.config;
    let root = ctx.root_prefix;
    let document_title = if ctx.title == config.title || ctx.title.is_empty() {
        escape(&config.title)
    } else {
        format!("{} - {}", escape(ctx.title), escape(&config.title))
    };

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!("<html lang=\"{}\">\n", escape(&config.language)));
    out.push_str("<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("  <title>{document_title}</title>\n"));
    if !config.description.is_empty() {
        out.push_str(&format!(
            "  <meta name=\"description\" content=\"{}\">\n",
            escape(&config.description)
        ));
    }
    if !config.author.is_empty() {
        out.push_str(&format!(
            "  <meta name=\"author\" content=\"{}\">\n",
            escape(&config.author)
        ));
    }
    out.push_str(&format!(
        "  <link rel=\"stylesheet\" href=\"{root}assets/style.css\">\n"
    ));
    out.push_str(&format!(
        "  <link rel=\"stylesheet\" href=\"{root}assets/highlight.css\">\n"
    ));
    // Applied before first paint to avoid a flash of the wrong theme.
    out.push_str(
        "  <script>try{var t=localStorage.getItem('mdsite-theme');if(t)document.documentElement.dataset.theme=t;}catch(e){}</script>\n",
    );
    out.push_str(&format!(
        "  <script src=\"{root}assets/script.js\" defer></script>\n"
    ));
    out.push_str("</head>\n");
    out.push_str("<body>\n");

    out.push_str("<header class=\"site-header\">\n");
    out.push_str(
        "  <button type=\"button\" id=\"sidebar-toggle\" aria-label=\"Toggle navigation\" aria-controls=\"sidebar\" aria-expanded=\"false\">&#9776;</button>\n",
    );
    out.push_str(&format!(
        "  <a class=\"site-title\" href=\"{root}index.html\">{}</a>\n",
        escape(&config.title)
    ));
    out.push_str("  <div class=\"search\">\n");
    out.push_str(
        "    <input type=\"search\" id=\"search-input\" placeholder=\"Search\" aria-label=\"Search\" autocomplete=\"off\">\n",
    );
    out.push_str("    <ul id=\"search-results\" hidden></ul>\n");
    out.push_str("  </div>\n");
    out.push_str(
        "  <button type=\"button\" id=\"theme-toggle\" aria-label=\"Toggle dark mode\">&#9680;</button>\n",
    );
    out.push_str("</header>\n");

    out.push_str("<div class=\"layout\">\n");
    out.push_str("<aside class=\"sidebar\" id=\"sidebar\">\n");
    out.push_str(ctx.sidebar_html);
    out.push_str("</aside>\n");

    out.push_str("<main class=\"content\">\n");
    out.push_str(ctx.content_html);
    if !ctx.content_html.ends_with('\n') {
        out.push('\n');
    }
    render_pagination(ctx, &mut out);
    out.push_str("</main>\n");

    if !ctx.toc.is_empty() {
        out.push_str("<aside class=\"toc\">\n");
        out.push_str("  <p class=\"toc-title\">On this page</p>\n");
        out.push_str("  <ul>\n");
        for entry in ctx.toc {
            out.push_str(&format!(
                "    <li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
                entry.level,
                escape(&entry.id),
                escape(&entry.title)
            ));
        }
        out.push_str("  </ul>\n");
        out.push_str("</aside>\n");
    }
    out.push_str("</div>\n");

    out.push_str("<footer class=\"site-footer\">\n");
    if !config.author.is_empty() {
        out.push_str(&format!("  <span>&copy; {}</span>\n", escape(&config.author)));
    }
    out.push_str(&format!(
        "  <span>Built {}</span>\n",
        escape(ctx.built_at)
    ));
    out.push_str("</footer>\n");
    out.push_str(
        "<button type=\"button\" id=\"back-to-top\" aria-label=\"Back to top\" hidden>&uarr;</button>\n",
    );
    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

fn render_pagination(ctx: &PageContext<'_>, out: &mut String) {
    if ctx.prev.is_none() && ctx.next.is_none() {
        return;
    }
    out.push_str("<nav class=\"pagination\">\n");
    if let Some(prev) = &ctx.prev {
        out.push_str(&format!(
            "  <a class=\"prev\" href=\"{}\">&larr; {}</a>\n",
            escape(&prev.href),
            escape(prev.title)
        ));
    }
    if let Some(next) = &ctx.next {
        out.push_str(&format!(
            "  <a class=\"next\" href=\"{}\">{} &rarr;</a>\n",
            escape(&next.href),
            escape(next.title)
        ));
    }
    out.push_str("</nav>\n");
}
