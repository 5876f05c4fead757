//! Project management
//!
//! A project is a directory holding `tickets.toml`, the task catalog and the
//! generated ticket file. Without a config file the current directory is used
//! with default settings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::{Config, CONFIG_FILE};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

const DEFAULT_CONFIG: &str = r#"# exam-tickets configuration

[files]
# Task catalog, one `Theme;Type;Complexity;Text` record per line
tasks = "tasks.txt"

# Generated tickets (rewritten on every run)
tickets = "tickets.txt"

[generation]
# Consecutive rejected candidates before the search stops
failure_bound = 1000

# "greedy" (randomized) or "exhaustive" (complete, small catalogs only)
strategy = "greedy"

# Largest candidate space the exhaustive strategy will enumerate
exhaustive_limit = 1000000

# Require two distinct task types in multi-task tickets
require_type_diversity = false

# Smallest number of tasks per ticket (1 allows single-task tickets)
min_tasks = 2

# Fixed seed for reproducible runs
# seed = 42
"#;

/// A ticket generation project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens the project from an explicit config file, or discovers it from the current directory
    pub fn discover(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };

        let root = match &config.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        Ok(Self { root, config })
    }

    /// Initializes a project at the given path, keeping an existing config file
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if root.exists() && !root.is_dir() {
            return Err(ProjectError::NotADirectory(root).into());
        }

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create project directory: {}", root.display()))?;

        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let config = Config::from_file(&config_path)?;
        Ok(Self { root, config })
    }

    /// Returns the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config file in use; `None` when running on defaults without a `tickets.toml`
    pub fn config_path(&self) -> Option<&Path> {
        self.config.config_file.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
