// src/pipeline/js.rs

use anyhow::{Context, Result};
use tracing::debug;

use super::source::{copy_newer_tree, select, with_suffix};
use super::{Layout, TaskReport, merge_streams};
use crate::fs::FileSystem;
use crate::transform::js;

pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let vendors = || {
        copy_newer_tree(
            fs,
            layout.root(),
            &layout.src("js/vendors/*.js"),
            &layout.dest("js/vendors"),
            |_, bytes| bytes,
        )
    };
    let app = || minify_app(fs, layout);
    merge_streams(vendors, app)
}

fn minify_app(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let mut report = TaskReport::default();
    for file in select(fs, layout.root(), &layout.src("js/app.js"))? {
        let text = fs.read_to_string(&file.path)?;
        let min = js::minify(&text).with_context(|| format!("minifying {:?}", file.path))?;
        let dest = layout.dest("js").join(with_suffix(&file.rel, ".min"));
        fs.write(&dest, min.as_bytes())?;
        debug!(path = ?dest, bytes = min.len(), "wrote minified script");
        report.written += 1;
    }
    Ok(report)
}
