// src/transform/svg/mod.rs

//! SVG parsing, minification and sprite building.

use thiserror::Error;

pub mod minify;
pub mod sprite;
pub mod xml;

pub use minify::{MinifyOptions, minify};
pub use sprite::build_sprite;
pub use xml::{Attr, Document, Element, Node};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SvgError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("line {line}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("element <{name}> is never closed")]
    Unclosed { name: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("root element is <{found}>, expected <svg>")]
    NotSvg { found: String },
}

/// Parse, minify and serialise in one step.
pub fn minify_str(text: &str, opts: &MinifyOptions) -> Result<String, SvgError> {
    let mut doc = Document::parse(text)?;
    minify(&mut doc, opts);
    Ok(doc.to_xml())
}
