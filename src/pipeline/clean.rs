// src/pipeline/clean.rs

use anyhow::Result;
use tracing::info;

use super::{Layout, TaskReport};
use crate::fs::FileSystem;

/// Delete the output tree. A missing output directory is fine.
pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let out = layout.output_dir();
    fs.remove_dir_all(&out)?;
    info!(path = ?out, "cleaned output directory");
    Ok(TaskReport::default())
}
