//! Build the content tree to static HTML

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::content::ContentManager;
use crate::Site;

/// Render every markdown document under the content directory into
/// `output_dir`, mirroring the directory layout with `.html` files.
pub fn run(site: &Site, manager: &ContentManager, output_dir: &Path) -> Result<()> {
    let ctx = site.site_context();
    let mut total = 0usize;

    for entry in WalkDir::new(&site.content_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let relative = path.strip_prefix(&site.content_dir)?;
        // hidden files would fail path validation anyway
        let hidden = relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|s| s.starts_with('.'))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let logical = format!("/{}", relative.to_string_lossy().replace('\\', "/"));

        let start = Instant::now();
        let bytes = manager
            .get(&logical, ctx.as_ref())
            .with_context(|| format!("rendering `{}`", logical))?;

        let out_path = output_dir.join(relative).with_extension("html");
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &bytes)?;

        tracing::info!(
            "'{}' => '{}' size {} usage {} ms",
            logical,
            out_path.display(),
            size_readable(bytes.len()),
            start.elapsed().as_millis()
        );
        total += 1;
    }

    tracing::info!("Done, total: {} files", total);
    Ok(())
}

/// Human-readable byte size.
fn size_readable(len: usize) -> String {
    if len < 1024 {
        return format!("{} B", len);
    }
    let mut size = len as f64 / 1024.0;
    for unit in ["KB", "MB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} GB", size)
}
