// src/config/theme.rs

//! Utility-class theme (`theme.toml`).
//!
//! ```toml
//! dark_mode = false            # false | "media" | "class"
//! purge = []
//! [font_family]
//! OpenSans = ["Open Sans"]
//! [core_plugins]
//! container = false
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::fs::FileSystem;

/// How `dark:` variants are generated, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawDarkMode")]
pub enum DarkMode {
    #[default]
    Disabled,
    /// `@media (prefers-color-scheme: dark)`.
    Media,
    /// `.dark` ancestor class.
    Class,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDarkMode {
    Flag(bool),
    Mode(String),
}

impl TryFrom<RawDarkMode> for DarkMode {
    type Error = String;

    fn try_from(raw: RawDarkMode) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawDarkMode::Flag(false) => Ok(DarkMode::Disabled),
            RawDarkMode::Flag(true) => Ok(DarkMode::Media),
            RawDarkMode::Mode(s) => match s.trim().to_lowercase().as_str() {
                "media" => Ok(DarkMode::Media),
                "class" => Ok(DarkMode::Class),
                "false" | "none" => Ok(DarkMode::Disabled),
                other => Err(format!(
                    "invalid dark_mode: {other} (expected false, \"media\" or \"class\")"
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub dark_mode: DarkMode,

    /// Extra content globs scanned for class names by the purge step.
    pub purge: Vec<String>,

    /// Font family utilities (`font-<key>`), merged over the defaults.
    pub font_family: BTreeMap<String, Vec<String>>,

    /// Per-plugin switches; anything not listed is enabled.
    pub core_plugins: BTreeMap<String, bool>,
}

impl Theme {
    /// Load the theme from `path`. A missing file yields the default theme.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Theme> {
        if !fs.exists(path) {
            debug!(path = ?path, "no theme file; using default theme");
            return Ok(Theme::default());
        }
        let text = fs.read_to_string(path)?;
        let theme: Theme =
            toml::from_str(&text).with_context(|| format!("parsing theme file {:?}", path))?;
        Ok(theme)
    }

    pub fn plugin_enabled(&self, plugin: &str) -> bool {
        self.core_plugins.get(plugin).copied().unwrap_or(true)
    }

    /// Default families followed by the configured ones; configured keys
    /// override defaults of the same name.
    pub fn font_families(&self) -> BTreeMap<String, Vec<String>> {
        let mut families: BTreeMap<String, Vec<String>> = BTreeMap::new();
        families.insert(
            "sans".to_string(),
            strings(&[
                "ui-sans-serif",
                "system-ui",
                "-apple-system",
                "BlinkMacSystemFont",
                "\"Segoe UI\"",
                "Roboto",
                "\"Helvetica Neue\"",
                "Arial",
                "sans-serif",
            ]),
        );
        families.insert(
            "serif".to_string(),
            strings(&[
                "ui-serif",
                "Georgia",
                "Cambria",
                "\"Times New Roman\"",
                "Times",
                "serif",
            ]),
        );
        families.insert(
            "mono".to_string(),
            strings(&[
                "ui-monospace",
                "SFMono-Regular",
                "Menlo",
                "Monaco",
                "Consolas",
                "monospace",
            ]),
        );
        for (key, stack) in &self.font_family {
            families.insert(key.clone(), stack.iter().map(|f| quote_family(f)).collect());
        }
        families
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Family names containing spaces must be quoted in CSS.
fn quote_family(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.contains(' ') && !trimmed.starts_with('"') && !trimmed.starts_with('\'') {
        format!("\"{trimmed}\"")
    } else {
        trimmed.to_string()
    }
}
