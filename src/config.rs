use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use todo::paths::todo_path_from_env;
use todo::render::{ColorMode, DEFAULT_PADDING};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Todo file; `~/` is expanded to the home directory
    pub file: Option<PathBuf>,
    /// Width of the index column when listing
    pub padding: usize,
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            file: None,
            padding: DEFAULT_PADDING,
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve the todo file: command line, then config, then `$HOME/.local/share/<program>`.
    pub fn todo_path(&self, file_override: Option<&PathBuf>, program: &str) -> todo::Result<PathBuf> {
        if let Some(path) = file_override {
            return Ok(path.clone());
        }
        if let Some(path) = &self.file {
            return Ok(expand_home(path));
        }
        todo_path_from_env(program)
    }

    /// Command-line color choice wins over the configured one.
    pub fn color_mode(&self, color_override: Option<ColorMode>) -> ColorMode {
        color_override.unwrap_or(self.color)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
