// src/pipeline/icon.rs

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::source::{glob_base, select};
use super::{Layout, TaskReport};
use crate::fs::FileSystem;
use crate::transform::svg::{self, Document, MinifyOptions};

/// Minify every icon with file-scoped ids and combine them into one sprite
/// named after the icon directory.
pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let pattern = layout.src("assets/icons/*.svg");
    let icons = select(fs, layout.root(), &pattern)?;
    if icons.is_empty() {
        debug!("no icons to combine");
        return Ok(TaskReport::default());
    }

    let mut symbols = Vec::with_capacity(icons.len());
    for icon in &icons {
        let text = fs.read_to_string(&icon.path)?;
        let mut doc =
            Document::parse(&text).with_context(|| format!("parsing icon {:?}", icon.path))?;
        let stem = icon.stem().to_string();
        svg::minify(
            &mut doc,
            &MinifyOptions {
                id_prefix: Some(format!("{stem}-")),
            },
        );
        symbols.push((format!("icon-{stem}"), doc));
    }

    let sprite = svg::build_sprite(symbols).context("building icon sprite")?;

    let base = glob_base(&pattern);
    let dir_name = base.rsplit('/').next().unwrap_or("icons");
    let dest = layout.dest("assets/images").join(format!("{dir_name}.svg"));
    fs.write(&dest, sprite.as_bytes())?;
    info!(path = ?dest, icons = icons.len(), "wrote icon sprite");

    Ok(TaskReport {
        written: 1,
        ..TaskReport::default()
    })
}
