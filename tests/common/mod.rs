#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use assetflow::fs::mock::MockFileSystem;
use assetflow::fs::{FileSystem, RealFileSystem};
use assetflow::pipeline::{Layout, Pipeline};
use assetflow::transform::html::HtmlOptions;

pub use assetflow_test_utils::init_tracing;

/// Pipeline over the real filesystem with the stock layout under `root`.
pub fn real_pipeline(root: &Path) -> Pipeline {
    Pipeline::new(
        Arc::new(RealFileSystem),
        Layout::standard(root),
        HtmlOptions::default(),
    )
}

/// Pipeline over `fs` with the stock layout under `root`.
pub fn mock_pipeline(fs: &MockFileSystem, root: &Path) -> Pipeline {
    let fs: Arc<dyn FileSystem> = Arc::new(fs.clone());
    Pipeline::new(fs, Layout::standard(root), HtmlOptions::default())
}

/// Every file under `dir`, keyed by its `/`-separated relative path.
pub fn snapshot_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&current) else {
            continue;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path
                    .strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                out.insert(rel, std::fs::read(&path).unwrap());
            }
        }
    }
    out
}

pub fn read_string(fs: &dyn FileSystem, path: &Path) -> String {
    fs.read_to_string(path).unwrap()
}
