//! HTML template system for page generation.
//!
//! Templates use `{{ variable }}` interpolation; `{{ variable? }}` renders as
//! an empty string when the variable is absent. Values are inserted verbatim,
//! so callers escape user content before putting it into a context.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a variable only when a value is present.
    #[must_use]
    pub fn with_optional(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Substituted values are never re-scanned for placeholders.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut output = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let end = after_open.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template {}", self.name))
            })?;

            let var_name = after_open[..end].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var_name, false),
            };

            match context.get(var_name) {
                Some(value) => output.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            }

            rest = &after_open[end + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(Template::new("base", DEFAULT_BASE_TEMPLATE));
        self.register(Template::new("home", DEFAULT_HOME_TEMPLATE));
        self.register(Template::new("post", DEFAULT_POST_TEMPLATE));
        self.register(Template::new("fallback", DEFAULT_FALLBACK_TEMPLATE));
        self.register(Template::new("not_found", DEFAULT_NOT_FOUND_TEMPLATE));
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Default base HTML template.
pub const DEFAULT_BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}{{ site_title_suffix? }}</title>
    <meta name="description" content="{{ description? }}">
    <link rel="canonical" href="{{ canonical_url }}">
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&display=swap" rel="stylesheet">
    {{ head_extra? }}
    <style>
        :root {
            --white: #FFFFFF;
            --pink: #FF57B2;
            --background: #1A1D23;
            --heading: #F8F8F8;
            --body: #D7D7D7;
            --info: #BBBBBB;
            --highlight: #282A36;
        }

        *, *::before, *::after { box-sizing: border-box; }
        * { margin: 0; padding: 0; }

        body {
            font-family: 'Inter', system-ui, -apple-system, sans-serif;
            background: var(--background);
            color: var(--body);
            -webkit-font-smoothing: antialiased;
        }

        a { color: inherit; text-decoration: none; }

        .container {
            max-width: 720px;
            margin: 0 auto;
            padding: 0 1.5rem;
        }

        .header { padding: 6.25rem 0 5rem; }
        .header img { height: 1.6rem; }

        .posts { padding-bottom: 5rem; }

        .post { display: block; margin-bottom: 3rem; }
        .post h1 { font-size: 1.75rem; color: var(--heading); line-height: 1.3; }
        .post p { margin: 0.5rem 0 1.5rem; font-size: 1.125rem; }
        .post:hover h1 { color: var(--pink); }

        .info { display: flex; gap: 1.5rem; font-size: 0.875rem; color: var(--info); }
        .info > span { display: inline-flex; align-items: center; gap: 0.5rem; }
        .info svg { width: 1.25rem; height: 1.25rem; }

        .load-more {
            border: 0;
            background: transparent;
            color: var(--pink);
            font-size: 1.125rem;
            font-weight: 600;
            cursor: pointer;
        }
        .load-more:disabled { opacity: 0.6; cursor: wait; }
        .load-more-error { margin-bottom: 1rem; color: var(--pink); }

        .banner { display: block; width: 100%; max-height: 25rem; object-fit: cover; }

        .article { padding: 5rem 1.5rem; }
        .article > h1 { font-size: 3rem; color: var(--heading); line-height: 1.2; margin-bottom: 1.5rem; }
        .article section { margin-top: 4rem; }
        .article h2 { font-size: 2.25rem; color: var(--heading); margin-bottom: 2rem; }
        .article p { font-size: 1.125rem; line-height: 1.8; margin-bottom: 1.5rem; }

        .loading h1, .not-found h1 { color: var(--heading); }
        .not-found a { color: var(--pink); }

        @media (max-width: 640px) {
            .article > h1 { font-size: 2.25rem; }
            .info { flex-wrap: wrap; gap: 1rem; }
        }
    </style>
</head>
<body>
    <header class="header">
        <div class="container">
            <a href="/"><img src="/Logo.svg" alt="logo"></a>
        </div>
    </header>
    {{ content }}
    {{ scripts? }}
</body>
</html>"##;

/// Listing page template.
pub const DEFAULT_HOME_TEMPLATE: &str = r#"<main class="container posts" id="posts">
    {{ items }}
    {{ load_more? }}
</main>"#;

/// Post page template.
pub const DEFAULT_POST_TEMPLATE: &str = r#"<img src="{{ banner_url }}" alt="banner" class="banner">
<main class="container article">
    <h1>{{ title }}</h1>
    <div class="info">
        {{ info }}
    </div>
    {{ sections }}
</main>"#;

/// Placeholder shown while a post is generated on demand.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = r#"<main class="container loading">
    <h1>{{ loading }}</h1>
</main>"#;

/// Not-found page template.
pub const DEFAULT_NOT_FOUND_TEMPLATE: &str = r#"<main class="container not-found">
    <h1>{{ heading }}</h1>
    <p><a href="/">{{ home_label }}</a></p>
</main>"#;
