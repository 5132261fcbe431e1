// src/pipeline/font.rs

use anyhow::Result;

use super::source::copy_newer_tree;
use super::{Layout, TaskReport};
use crate::fs::FileSystem;

pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    copy_newer_tree(
        fs,
        layout.root(),
        &layout.src("assets/fonts/*"),
        &layout.dest("assets/fonts"),
        |_, bytes| bytes,
    )
}
