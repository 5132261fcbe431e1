// src/pipeline/html.rs

use anyhow::{Context, Result};
use tracing::debug;

use super::source::{select, with_extension};
use super::{Layout, TaskReport};
use crate::fs::FileSystem;
use crate::transform::html::{HtmlOptions, render_page};

/// Render every page in `pages/` into the output root as `.html`.
pub fn run(fs: &dyn FileSystem, layout: &Layout, opts: &HtmlOptions) -> Result<TaskReport> {
    let mut report = TaskReport::default();
    for page in select(fs, layout.root(), &layout.src("pages/*.shtml"))? {
        let text = fs.read_to_string(&page.path)?;
        let html = render_page(fs, &page.path, &text, opts)
            .with_context(|| format!("rendering page {:?}", page.path))?;
        let dest = layout.output_dir().join(with_extension(&page.rel, "html"));
        fs.write(&dest, html.as_bytes())?;
        debug!(path = ?dest, "wrote page");
        report.written += 1;
    }
    Ok(report)
}
