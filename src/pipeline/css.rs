// src/pipeline/css.rs

//! The stylesheet chain.
//!
//! `fonts.css` is copied as-is. `app.css` goes through import inlining and
//! utility generation, plus prefixing, purging and minification for the
//! production profile. Failures in the `app.css` chain are reported and
//! swallowed: the task still succeeds without writing `app.min.css`.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, error};

use super::source::{read_all, select, with_suffix};
use super::{Layout, TaskReport, merge_streams};
use crate::config::Theme;
use crate::fs::FileSystem;
use crate::transform::css::{self, extract_candidates};
use crate::types::BuildProfile;

pub fn run(fs: &dyn FileSystem, layout: &Layout, profile: BuildProfile) -> Result<TaskReport> {
    let fonts = || copy_fonts_css(fs, layout);
    let app = || build_app_css(fs, layout, profile);
    merge_streams(fonts, app)
}

fn copy_fonts_css(fs: &dyn FileSystem, layout: &Layout) -> Result<TaskReport> {
    let mut report = TaskReport::default();
    for file in select(fs, layout.root(), &layout.src("css/fonts.css"))? {
        let bytes = fs.read(&file.path)?;
        fs.write(&layout.dest("css").join(&file.rel), &bytes)?;
        report.written += 1;
    }
    Ok(report)
}

fn build_app_css(
    fs: &dyn FileSystem,
    layout: &Layout,
    profile: BuildProfile,
) -> Result<TaskReport> {
    let mut report = TaskReport::default();
    for file in select(fs, layout.root(), &layout.src("css/app.css"))? {
        match compile_app(fs, layout, &file.path, profile) {
            Ok(text) => {
                let dest = layout.dest("css").join(with_suffix(&file.rel, ".min"));
                fs.write(&dest, text.as_bytes())?;
                debug!(path = ?dest, %profile, bytes = text.len(), "wrote stylesheet");
                report.written += 1;
            }
            Err(err) => {
                let message = format!("{err:#}");
                println!("{message}");
                error!(path = ?file.path, error = %message, "stylesheet chain failed; output skipped");
                report.swallowed.push(message);
            }
        }
    }
    Ok(report)
}

fn compile_app(
    fs: &dyn FileSystem,
    layout: &Layout,
    path: &std::path::Path,
    profile: BuildProfile,
) -> Result<String> {
    let theme = Theme::load(fs, &layout.theme_file())?;
    let mut sheet = css::compile(fs, path, &theme)?;

    match profile {
        BuildProfile::Dev => Ok(sheet.to_pretty()),
        BuildProfile::Prod => {
            css::prefix(&mut sheet);
            let candidates = purge_candidates(fs, layout, &theme)?;
            let sheet = css::purge(sheet, &candidates);
            Ok(css::minify(&sheet))
        }
    }
}

fn purge_candidates(
    fs: &dyn FileSystem,
    layout: &Layout,
    theme: &Theme,
) -> Result<HashSet<String>> {
    let mut patterns = vec![layout.src("**/*.shtml"), layout.src("js/**/*.js")];
    patterns.extend(theme.purge.iter().cloned());

    let mut candidates = HashSet::new();
    for content in read_all(fs, layout.root(), &patterns)? {
        candidates.extend(extract_candidates(&content));
    }
    debug!(count = candidates.len(), "purge candidates");
    Ok(candidates)
}
