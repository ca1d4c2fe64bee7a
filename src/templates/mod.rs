//! Template catalog backed by Tera
//!
//! The content pipeline needs two capabilities from a template engine:
//! render a template by identity and render a literal template source. The
//! catalog distinguishes a missing template, which the pipeline recovers
//! from with a fallback, from every other engine failure, which is fatal.

use std::path::Path;

use tera::Tera;
use thiserror::Error;

use crate::content::RenderContext;

/// Markup used when a layout cannot be resolved and no fallback template
/// is configured.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = r#"<html><head><title>{{ title | default(value="") }}</title></head><body>{{ content | safe }}</body><!--fallback render--></html>"#;

/// Errors reported by a template catalog.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The catalog has no template under the requested identity.
    #[error("unable to resolve template `{0}`")]
    Unresolvable(String),

    /// The engine failed while parsing or executing a template.
    #[error("template engine error")]
    Engine(#[source] tera::Error),
}

/// Lookup-by-identity and render-with-context capability.
pub trait TemplateCatalog: Send + Sync {
    /// Render the template registered under `name`.
    fn render(&self, name: &str, context: &RenderContext) -> Result<String, TemplateError>;

    /// Render a literal template source.
    fn render_str(&self, source: &str, context: &RenderContext) -> Result<String, TemplateError>;
}

/// Catalog loading `*.html` templates from a directory tree.
///
/// Template identities are paths relative to the root, e.g.
/// `blog/page.html`. Tera's default autoescaping applies, so templates
/// emit the rendered body with `{{ content | safe }}`.
pub struct TeraCatalog {
    tera: Tera,
}

impl TeraCatalog {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, TemplateError> {
        let pattern = format!("{}/**/*.html", dir.as_ref().display());
        let tera = Tera::new(&pattern).map_err(TemplateError::Engine)?;
        Ok(Self { tera })
    }
}

impl TemplateCatalog for TeraCatalog {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String, TemplateError> {
        let ctx = tera_context(context)?;
        self.tera.render(name, &ctx).map_err(|err| match err.kind {
            tera::ErrorKind::TemplateNotFound(name) => TemplateError::Unresolvable(name),
            _ => TemplateError::Engine(err),
        })
    }

    fn render_str(&self, source: &str, context: &RenderContext) -> Result<String, TemplateError> {
        let ctx = tera_context(context)?;
        Tera::one_off(source, &ctx, true).map_err(TemplateError::Engine)
    }
}

fn tera_context(context: &RenderContext) -> Result<tera::Context, TemplateError> {
    tera::Context::from_serialize(context).map_err(TemplateError::Engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn context(pairs: &[(&str, serde_json::Value)]) -> RenderContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "<main>{{ content | safe }}</main>").unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/page.html"), "blog: {{ title }}").unwrap();

        let catalog = TeraCatalog::from_dir(dir.path()).unwrap();
        let ctx = context(&[
            ("content", json!("<p>hi</p>")),
            ("title", json!("post")),
        ]);

        assert_eq!(catalog.render("page.html", &ctx).unwrap(), "<main><p>hi</p></main>");
        assert_eq!(catalog.render("blog/page.html", &ctx).unwrap(), "blog: post");
    }

    #[test]
    fn test_missing_template_is_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TeraCatalog::from_dir(dir.path()).unwrap();

        let err = catalog.render("nope.html", &RenderContext::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Unresolvable(_)));
    }

    #[test]
    fn test_default_fallback_markup() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TeraCatalog::from_dir(dir.path()).unwrap();

        let ctx = context(&[
            ("title", json!("Home")),
            ("content", json!("<h1>body</h1>")),
        ]);
        let out = catalog.render_str(DEFAULT_FALLBACK_TEMPLATE, &ctx).unwrap();
        assert_eq!(
            out,
            "<html><head><title>Home</title></head><body><h1>body</h1></body><!--fallback render--></html>"
        );
    }

    #[test]
    fn test_default_fallback_tolerates_missing_title() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TeraCatalog::from_dir(dir.path()).unwrap();

        let ctx = context(&[("content", json!("x"))]);
        let out = catalog.render_str(DEFAULT_FALLBACK_TEMPLATE, &ctx).unwrap();
        assert!(out.contains("<title></title>"));
    }

    #[test]
    fn test_autoescape_applies_to_templates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "{{ title }}").unwrap();

        let catalog = TeraCatalog::from_dir(dir.path()).unwrap();
        let ctx = context(&[("title", json!("<b>bold</b>"))]);
        let out = catalog.render("page.html", &ctx).unwrap();
        assert_eq!(out, "&lt;b&gt;bold&lt;&#x2F;b&gt;");
    }
}
