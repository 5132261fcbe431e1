// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, RecipeEntry};
use crate::dag::plan::{Plan, Recipe};
use crate::errors::{AssetflowError, Result};
use crate::pipeline::TaskKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AssetflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_global_config(cfg)?;
    validate_recipe("prod", &cfg.build.prod)?;
    validate_recipe("dev", &cfg.build.dev)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    if paths.source.trim().is_empty() || paths.output.trim().is_empty() {
        return Err(AssetflowError::ConfigError(
            "[paths].source and [paths].output must not be empty".to_string(),
        ));
    }
    if paths.source.trim_end_matches('/') == paths.output.trim_end_matches('/') {
        return Err(AssetflowError::ConfigError(format!(
            "[paths].output must differ from [paths].source (both are '{}')",
            paths.source
        )));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.queue_length == 0 {
        return Err(AssetflowError::ConfigError(
            "[watch].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.html.indent_size == 0 {
        return Err(AssetflowError::ConfigError(
            "[html].indent_size must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.html.include_prefix.trim().is_empty() {
        return Err(AssetflowError::ConfigError(
            "[html].include_prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_recipe(label: &str, entries: &[RecipeEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(AssetflowError::ConfigError(format!(
            "[build].{label} must list at least one task"
        )));
    }

    for entry in entries {
        if let RecipeEntry::Parallel(group) = entry {
            if group.is_empty() {
                return Err(AssetflowError::ConfigError(format!(
                    "[build].{label} contains an empty parallel group"
                )));
            }
        }
        for name in entry.task_names() {
            if TaskKind::from_name(name).is_none() {
                return Err(AssetflowError::ConfigError(format!(
                    "[build].{label} references unknown task '{name}'"
                )));
            }
        }
    }

    // A task listed twice in sequence would have to run both before and
    // after itself; the plan builder reports that as a cycle.
    let recipe = Recipe::from_entries(entries)?;
    Plan::from_recipe(format!("{label}:build"), &recipe)?;
    Ok(())
}
