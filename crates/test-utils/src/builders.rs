#![allow(dead_code)]

use assetflow::config::{ConfigFile, RawConfigFile, RecipeEntry};
use assetflow::errors::Result;
use assetflow::types::TriggerWhileRunningBehaviour;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Replace the production recipe with a plain series of tasks.
    pub fn prod(mut self, tasks: &[&str]) -> Self {
        self.config.build.prod = series(tasks);
        self
    }

    /// Replace the development recipe with a plain series of tasks.
    pub fn dev(mut self, tasks: &[&str]) -> Self {
        self.config.build.dev = series(tasks);
        self
    }

    /// Append a parallel group to the production recipe.
    pub fn prod_parallel(mut self, tasks: &[&str]) -> Self {
        self.config.build.prod.push(RecipeEntry::Parallel(
            tasks.iter().map(|t| t.to_string()).collect(),
        ));
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.watch.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.watch.queue_length = len;
        self
    }

    pub fn watch_exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn paths(mut self, source: &str, output: &str) -> Self {
        self.config.paths.source = source.to_string();
        self.config.paths.output = output.to_string();
        self
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn series(tasks: &[&str]) -> Vec<RecipeEntry> {
    tasks
        .iter()
        .map(|t| RecipeEntry::Task(t.to_string()))
        .collect()
}
