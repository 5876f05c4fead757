//! Configuration handling
//!
//! Configuration is stored in `tickets.toml` (project) and
//! `~/.config/exam-tickets/config.toml` (global). Command-line flags override
//! both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{SamplingStrategy, ValidationRules, DEFAULT_FAILURE_BOUND};

/// Project configuration file name
pub const CONFIG_FILE: &str = "tickets.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Input and output file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Task catalog (`Theme;Type;Complexity;Text` per line)
    pub tasks: PathBuf,

    /// Generated tickets, rewritten on every run
    pub tickets: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tasks: PathBuf::from("tasks.txt"),
            tickets: PathBuf::from("tickets.txt"),
        }
    }
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Consecutive rejected candidates before a randomized search stops
    pub failure_bound: u32,

    /// Candidate sampling strategy
    pub strategy: SamplingStrategy,

    /// Largest candidate space the exhaustive strategy will enumerate
    pub exhaustive_limit: u64,

    /// Require two distinct task types in multi-task tickets
    pub require_type_diversity: bool,

    /// Smallest number of tasks per ticket; 1 allows single-task tickets
    pub min_tasks: usize,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            failure_bound: DEFAULT_FAILURE_BOUND,
            strategy: SamplingStrategy::Greedy,
            exhaustive_limit: 1_000_000,
            require_type_diversity: rules.require_type_diversity,
            min_tasks: rules.min_tasks,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Validation rules described by this configuration
    pub fn rules(&self) -> ValidationRules {
        ValidationRules {
            require_type_diversity: self.require_type_diversity,
            min_tasks: self.min_tasks,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_bound == 0 {
            return Err(ConfigError::Invalid(
                "generation.failure_bound must be at least 1".to_string(),
            ));
        }
        if self.min_tasks == 0 {
            return Err(ConfigError::Invalid(
                "generation.min_tasks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    pub files: FilesConfig,
    pub generation: GenerationConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,

    /// Project file the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let Some(root) = Self::find_project_root() else {
            return Ok(Self {
                project: ProjectConfig::default(),
                global: Self::load_global()?,
                project_root: None,
                config_file: None,
            });
        };

        let mut config = Self::from_file(&root.join(CONFIG_FILE))?;
        config.project_root = Some(root);
        Ok(config)
    }

    /// Loads configuration from an explicit project file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let global = Self::load_global()?;
        let project = Self::load_project_config(path)?;
        let project_root = path
            .parent()
            .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
            .map(Path::to_path_buf);

        Ok(Self {
            project,
            global,
            project_root,
            config_file: Some(path.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "exam-tickets", "exam-tickets")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads and validates a project configuration file
    fn load_project_config(config_path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config.generation.validate()?;
        Ok(config)
    }

    /// Finds the project root by looking for `tickets.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolves a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Path of the task catalog
    pub fn tasks_path(&self) -> PathBuf {
        self.resolve(&self.project.files.tasks)
    }

    /// Path of the generated ticket file
    pub fn tickets_path(&self) -> PathBuf {
        self.resolve(&self.project.files.tickets)
    }
}
