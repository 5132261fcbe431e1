// src/pipeline/image.rs

use anyhow::Result;

use super::source::{SourceFile, copy_newer_tree};
use super::{Layout, TaskReport, merge_streams};
use crate::fs::FileSystem;
use crate::transform::image::optimise;

pub fn run(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let images = || {
        copy_newer_tree(
            fs,
            layout.root(),
            &layout.src("assets/images/**/*"),
            &layout.dest("assets/images"),
            optimise_file,
        )
    };
    let uploads = || {
        copy_newer_tree(
            fs,
            layout.root(),
            &layout.src("assets/uploads/**/*"),
            &layout.dest("assets/uploads"),
            optimise_file,
        )
    };
    merge_streams(images, uploads)
}

fn optimise_file(file: &SourceFile, bytes: Vec<u8>) -> Vec<u8> {
    let ext = file.path.extension().and_then(|e| e.to_str());
    optimise(ext, bytes)
}
