// src/transform/mod.rs

//! In-process file transforms used by the pipeline tasks.
//!
//! Each transform works on in-memory text or bytes and reports failures
//! through its own error enum; the pipeline turns those into task errors (or
//! swallows them, for the stylesheet chain).

pub mod css;
pub mod html;
pub mod image;
pub mod js;
pub mod svg;
