//! mdsite: a markdown content server with JSON front matter
//!
//! Resolves logical paths across layered content sources, extracts a JSON
//! front-matter block, renders the markdown body, and wraps it in a Tera
//! layout template chosen by directory convention or front-matter override.

pub mod commands;
pub mod content;
pub mod server;
pub mod source;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use content::{ContentManager, RenderContext};
use source::DirSource;
use templates::TeraCatalog;

/// A site rooted at a directory with `content/`, `template/` and `static/`
/// subdirectories and an optional `config.json`.
#[derive(Clone)]
pub struct Site {
    /// Site root directory
    pub root_dir: PathBuf,
    /// Markdown documents served through the pipeline
    pub content_dir: PathBuf,
    /// Layout templates
    pub template_dir: PathBuf,
    /// Files served verbatim under `/static`
    pub static_dir: PathBuf,
}

impl Site {
    /// Create a site from a root directory
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        if !root_dir.is_dir() {
            return Err(anyhow!("`{}` is not a directory", root_dir.display()));
        }
        Ok(Self {
            content_dir: root_dir.join("content"),
            template_dir: root_dir.join("template"),
            static_dir: root_dir.join("static"),
            root_dir,
        })
    }

    /// Create the content, template and static directories if missing.
    pub fn prepare(&self) -> Result<()> {
        for dir in [&self.content_dir, &self.template_dir, &self.static_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Site-wide context from `config.json`, if present and well-formed.
    ///
    /// Re-read on every call so edits take effect without a restart.
    pub fn site_context(&self) -> Option<RenderContext> {
        let data = fs::read(self.root_dir.join("config.json")).ok()?;
        serde_json::from_slice(&data).ok()
    }

    /// Wire a content manager over this site's directories.
    pub fn content_manager(&self) -> Result<ContentManager> {
        let mut manager = ContentManager::new();
        manager.add_source(DirSource::new(&self.content_dir));
        manager.set_catalog(TeraCatalog::from_dir(&self.template_dir)?);
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_site_rejects_missing_root() {
        assert!(Site::new("/no/such/root/dir").is_err());
    }

    #[test]
    fn test_site_context_from_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"title": "My Site", "author": "me"}"#,
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        let ctx = site.site_context().unwrap();
        assert_eq!(ctx.get("title"), Some(&json!("My Site")));
    }

    #[test]
    fn test_site_context_absent_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(site.site_context().is_none());

        fs::write(dir.path().join("config.json"), "not json").unwrap();
        assert!(site.site_context().is_none());
    }

    #[test]
    fn test_wired_manager_serves_content() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        site.prepare().unwrap();
        fs::write(site.content_dir.join("index.md"), "hello site").unwrap();
        fs::write(
            site.template_dir.join("index.html"),
            "<body>{{ content | safe }}</body>",
        )
        .unwrap();

        let manager = site.content_manager().unwrap();
        let out = manager.get("/", None).unwrap();
        assert_eq!(out, b"<body><p>hello site</p>\n</body>");
    }
}
