// src/pipeline/static_files.rs

//! Loose files at the top of the source tree (`favicon.ico`, `robots.txt`).

use anyhow::Result;

use super::source::copy_newer_tree;
use super::{Layout, TaskReport};
use crate::fs::FileSystem;

pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    copy_newer_tree(
        fs,
        layout.root(),
        &layout.src("*.*"),
        &layout.output_dir(),
        |_, bytes| bytes,
    )
}
