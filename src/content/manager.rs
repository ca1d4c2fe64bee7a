//! Render orchestrator
//!
//! `ContentManager` composes the layered sources, front-matter extraction,
//! markdown rendering, context merging, layout resolution and the template
//! catalog into the single `get` entry point used by the server and the
//! build command. All per-call state is allocated fresh, and the manager
//! is immutable after setup, so one instance can serve concurrent calls.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::source::ContentSource;
use crate::templates::{TemplateCatalog, TemplateError, DEFAULT_FALLBACK_TEMPLATE};

use super::context::{ContextLayers, KEY_CONTENT, KEY_LAYOUT};
use super::error::{ContentError, FailureStatus};
use super::layout::match_layout;
use super::{frontmatter, MarkdownRenderer, RenderContext};

/// Supplies the lowest-precedence context layer for a path.
pub type GlobalContextFn = Box<dyn Fn(&str) -> RenderContext + Send + Sync>;

/// Maps a failed request to the sibling document rendered in its place.
pub type ExceptionNameFn = Box<dyn Fn(&str, FailureStatus) -> String + Send + Sync>;

/// Extracted context and rendered HTML body of one markdown document.
struct ParsedDocument {
    context: RenderContext,
    html: String,
}

pub struct ContentManager {
    sources: Vec<Box<dyn ContentSource>>,
    catalog: Option<Box<dyn TemplateCatalog>>,
    fallback_template: Option<String>,
    global_context: Option<GlobalContextFn>,
    exception_name: Option<ExceptionNameFn>,
    renderer: MarkdownRenderer,
}

impl ContentManager {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            catalog: None,
            fallback_template: None,
            global_context: None,
            exception_name: None,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Append a content source; earlier sources win on conflicts.
    ///
    /// Sources must only be added during single-threaded setup, before the
    /// manager is shared.
    pub fn add_source(&mut self, source: impl ContentSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Without a catalog the manager returns rendered HTML bodies as-is.
    pub fn set_catalog(&mut self, catalog: impl TemplateCatalog + 'static) {
        self.catalog = Some(Box::new(catalog));
    }

    /// Template source used when a layout cannot be resolved.
    pub fn set_fallback_template(&mut self, source: impl Into<String>) {
        self.fallback_template = Some(source.into());
    }

    /// Provider of the lowest-precedence context layer.
    pub fn set_global_context(
        &mut self,
        provider: impl Fn(&str) -> RenderContext + Send + Sync + 'static,
    ) {
        self.global_context = Some(Box::new(provider));
    }

    /// Override the 404.md/500.md exception document convention.
    pub fn set_exception_name(
        &mut self,
        resolver: impl Fn(&str, FailureStatus) -> String + Send + Sync + 'static,
    ) {
        self.exception_name = Some(Box::new(resolver));
    }

    /// Resolve `path` across the registered sources, first hit wins.
    ///
    /// Paths must be rooted at `/` and may not contain dot-prefixed
    /// segments; such paths are rejected before any source is consulted.
    pub fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, ContentError> {
        if !path.starts_with('/') || path.contains("/.") {
            return Err(ContentError::InvalidPath(path.to_string()));
        }
        for source in &self.sources {
            if let Some(reader) = source.open(path) {
                return Ok(reader);
            }
        }
        Err(ContentError::NotFound(path.to_string()))
    }

    /// Resolve `path` to rendered output bytes.
    ///
    /// A trailing `/` requests `index.md` under that directory and an
    /// extensionless path gets `.md` appended. Non-markdown content is
    /// passed through unmodified.
    pub fn get(
        &self,
        path: &str,
        caller_context: Option<&RenderContext>,
    ) -> Result<Vec<u8>, ContentError> {
        let mut name = path.to_string();
        if name.ends_with('/') {
            name.push_str("index.md");
        }
        let mut ext = extension(&name);
        if ext.is_empty() {
            name.push_str(".md");
            ext = "md".to_string();
        }

        let reader = match self.open(&name) {
            Ok(reader) => reader,
            Err(err @ ContentError::InvalidPath(_)) => return Err(err),
            Err(err) => {
                let status = err.status();
                return self.handle_exception(&name, err, status, caller_context);
            }
        };

        let data = read_all(reader, &name)?;
        if ext != "md" {
            return Ok(data);
        }
        self.render_document(&name, &data, caller_context)
    }

    /// Render the sibling exception document in place of a failed request.
    ///
    /// Exactly one substitution is attempted; when the sibling cannot be
    /// opened the original error is returned unchanged.
    fn handle_exception(
        &self,
        name: &str,
        prev: ContentError,
        status: FailureStatus,
        caller_context: Option<&RenderContext>,
    ) -> Result<Vec<u8>, ContentError> {
        let sibling = match &self.exception_name {
            Some(resolve) => resolve(name, status),
            None => default_exception_name(name, status),
        };
        let dir = match name.rfind('/') {
            Some(pos) => &name[..pos + 1],
            None => "/",
        };
        let fname = format!("{}{}", dir, sibling);

        let reader = match self.open(&fname) {
            Ok(reader) => reader,
            Err(_) => return Err(prev),
        };
        let data = read_all(reader, &fname)?;
        // keyed by the original name, so layout and global context still
        // derive from the request that failed
        self.render_document(name, &data, caller_context)
    }

    fn render_document(
        &self,
        name: &str,
        data: &[u8],
        caller_context: Option<&RenderContext>,
    ) -> Result<Vec<u8>, ContentError> {
        let doc = self.parse(data);

        let Some(catalog) = &self.catalog else {
            return Ok(doc.html.into_bytes());
        };

        let mut layers = ContextLayers::new();
        layers.push(doc.context);
        if let Some(caller) = caller_context {
            layers.push(caller.clone());
        }
        if let Some(global) = &self.global_context {
            layers.push(global(name));
        }
        let mut context = layers.resolve();

        let layout = match context.get(KEY_LAYOUT).and_then(Value::as_str) {
            Some(layout) => layout.to_string(),
            None => match_layout(name),
        };

        context.insert(KEY_CONTENT.to_string(), Value::String(doc.html));

        let rendered = match catalog.render(&layout, &context) {
            Ok(rendered) => rendered,
            Err(TemplateError::Unresolvable(_)) => {
                let source = self
                    .fallback_template
                    .as_deref()
                    .unwrap_or(DEFAULT_FALLBACK_TEMPLATE);
                catalog
                    .render_str(source, &context)
                    .map_err(|err| ContentError::Template {
                        name: layout,
                        source: err,
                    })?
            }
            Err(err) => {
                return Err(ContentError::Template {
                    name: layout,
                    source: err,
                })
            }
        };
        Ok(rendered.into_bytes())
    }

    fn parse(&self, data: &[u8]) -> ParsedDocument {
        let (context, body) = frontmatter::extract(data);
        let html = self.renderer.render(&String::from_utf8_lossy(body));
        ParsedDocument { context, html }
    }
}

impl Default for ContentManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Default exception document convention.
fn default_exception_name(_name: &str, status: FailureStatus) -> String {
    match status {
        FailureStatus::NotFound => "404.md".to_string(),
        FailureStatus::Internal => "500.md".to_string(),
    }
}

/// Lower-cased extension of `name`, without the dot.
fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn read_all(mut reader: Box<dyn Read + Send>, path: &str) -> Result<Vec<u8>, ContentError> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|source| ContentError::Read {
            path: path.to_string(),
            source,
        })?;
    Ok(data)
}
