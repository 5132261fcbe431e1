// src/config/mod.rs

//! Configuration loading and validation for assetflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load `Assetflow.toml` from disk, falling back to defaults (`loader.rs`).
//! - Validate build recipes and global settings (`validate.rs`).
//! - Load the utility-class theme consumed by the stylesheet chain (`theme.rs`).

pub mod loader;
pub mod model;
pub mod theme;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    BuildSection, ConfigFile, HtmlSection, PathsSection, RawConfigFile, RecipeEntry, ServerSection,
    WatchSection,
};
pub use theme::{DarkMode, Theme};
