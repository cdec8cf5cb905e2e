//! HTML generation for the blog pages.
//!
//! Every page is rendered as an inner template wrapped in the base layout.
//! The listing page additionally embeds its first page as a JSON seed that
//! the WASM frontend picks up to drive "load more".

use spacetraveling_core::{
    Article, ArticleSummary, Config, CoreError, DateFormatter, ListingSeed, Page, PostPreview,
    Section, icons,
};
use thiserror::Error;
use tracing::debug;

use crate::template::{Template, TemplateContext, TemplateError, TemplateRegistry};

/// Module script that boots the WASM frontend.
pub const FRONTEND_BOOTSTRAP: &str = "import init from '/pkg/spacetraveling.js'; init();";

/// Seconds before the fallback placeholder reloads itself.
const FALLBACK_REFRESH_SECS: u32 = 2;

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Seed serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
    dates: DateFormatter,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_templates(config, TemplateRegistry::new())
    }

    /// Create a generator with custom templates.
    pub fn with_templates(config: Config, templates: TemplateRegistry) -> Result<Self> {
        let dates = config.date_formatter()?;
        Ok(Self {
            templates,
            config,
            dates,
        })
    }

    /// Register a custom template.
    pub fn register_template(&mut self, template: Template) {
        self.templates.register(template);
    }

    /// Generate the listing page for the first page of posts.
    pub fn generate_home(&self, page: &Page<ArticleSummary>) -> Result<String> {
        debug!(posts = page.items.len(), "generating listing page");

        let items: String = page
            .items
            .iter()
            .map(|summary| post_item_html(&PostPreview::from_summary(summary, &self.dates)))
            .collect();

        let load_more = page
            .next_cursor
            .as_ref()
            .map(|_| load_more_html(&self.config.labels.load_more));

        let inner_ctx = TemplateContext::new()
            .with_var("items", items)
            .with_optional("load_more", load_more);
        let inner_html = self.templates.render("home", &inner_ctx)?;

        let seed = ListingSeed::new(&self.config, page.clone());
        let scripts = format!(
            "<script id=\"{}\" type=\"application/json\">{}</script>\n    <script type=\"module\">{FRONTEND_BOOTSTRAP}</script>",
            ListingSeed::ELEMENT_ID,
            seed_json(&seed)?
        );

        self.wrap(
            &self.config.site.title,
            "/",
            inner_html,
            None,
            Some(scripts),
        )
    }

    /// Generate the page of a single post.
    pub fn generate_post(&self, article: &Article) -> Result<String> {
        debug!(id = %article.id, "generating post page");

        let info = format!(
            "{}\n        {}\n        {}",
            info_html(
                icons::CALENDAR,
                &self.dates.format_optional(article.published_at.as_ref())
            ),
            info_html(icons::USER, &article.author),
            info_html(
                icons::CLOCK,
                &format!(
                    "{} {}",
                    article.reading_time(),
                    self.config.labels.reading_time_suffix
                )
            ),
        );

        let sections: String = article.sections.iter().map(section_html).collect();

        let inner_ctx = TemplateContext::new()
            .with_var("banner_url", escape_html(&article.banner_url))
            .with_var("title", escape_html(&article.title))
            .with_var("info", info)
            .with_var("sections", sections);
        let inner_html = self.templates.render("post", &inner_ctx)?;

        self.wrap(&article.title, &article.href(), inner_html, None, None)
    }

    /// Generate the placeholder served while a post is generated on demand.
    ///
    /// The placeholder reloads itself so the reader lands on the real page
    /// once generation has finished.
    pub fn generate_fallback(&self, slug: &str) -> Result<String> {
        debug!(slug, "generating fallback page");

        let labels = &self.config.labels;
        let inner_ctx = TemplateContext::new().with_var("loading", escape_html(&labels.loading));
        let inner_html = self.templates.render("fallback", &inner_ctx)?;

        let refresh = format!(
            r#"<meta http-equiv="refresh" content="{FALLBACK_REFRESH_SECS}"><meta name="robots" content="noindex">"#
        );
        self.wrap(
            &labels.loading,
            &spacetraveling_core::content::post_href(slug),
            inner_html,
            Some(refresh),
            None,
        )
    }

    /// Generate the page shown for unknown posts.
    pub fn generate_not_found(&self) -> Result<String> {
        let labels = &self.config.labels;
        let inner_ctx = TemplateContext::new()
            .with_var("heading", escape_html(&labels.not_found))
            .with_var("home_label", escape_html(&self.config.site.title));
        let inner_html = self.templates.render("not_found", &inner_ctx)?;

        self.wrap(
            &labels.not_found,
            "/",
            inner_html,
            Some(r#"<meta name="robots" content="noindex">"#.to_string()),
            None,
        )
    }

    fn wrap(
        &self,
        title: &str,
        path: &str,
        content: String,
        head_extra: Option<String>,
        scripts: Option<String>,
    ) -> Result<String> {
        let site = &self.config.site;
        let suffix = (title != site.title).then(|| format!(" | {}", escape_html(&site.title)));

        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.lang))
            .with_var("title", escape_html(title))
            .with_optional("site_title_suffix", suffix)
            .with_optional("description", site.description.as_deref().map(escape_html))
            .with_var("canonical_url", escape_html(&self.config.url_for(path)))
            .with_var("content", content)
            .with_optional("head_extra", head_extra)
            .with_optional("scripts", scripts);

        Ok(self.templates.render("base", &ctx)?)
    }
}

/// Markup of one post in the listing.
pub fn post_item_html(preview: &PostPreview) -> String {
    format!(
        r#"<a class="post" href="{href}">
        <h1>{title}</h1>
        <p>{subtitle}</p>
        <div class="info">
            {date}
            {author}
        </div>
    </a>
    "#,
        href = escape_html(&preview.href),
        title = escape_html(&preview.title),
        subtitle = escape_html(&preview.subtitle),
        date = info_html(icons::CALENDAR, &preview.published),
        author = info_html(icons::USER, &preview.author),
    )
}

/// Markup of the "load more" control.
pub fn load_more_html(label: &str) -> String {
    format!(
        r#"<button type="button" class="load-more">{}</button>"#,
        escape_html(label)
    )
}

fn info_html(icon: &str, text: &str) -> String {
    format!("<span>{icon}{}</span>", escape_html(text))
}

fn section_html(section: &Section) -> String {
    let mut html = String::from("<section>");
    if !section.heading.is_empty() {
        html.push_str(&format!("<h2>{}</h2>", escape_html(&section.heading)));
    }
    for paragraph in &section.paragraphs {
        html.push_str(&format!("<p>{}</p>", escape_html(paragraph)));
    }
    html.push_str("</section>");
    html
}

/// Serialize the listing seed for embedding inside a `<script>` element.
///
/// `<` only ever appears inside JSON strings, where `\u003c` is an
/// equivalent escape that cannot close the element.
pub fn seed_json(seed: &ListingSeed) -> Result<String> {
    Ok(serde_json::to_string(seed)?.replace('<', "\\u003c"))
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
