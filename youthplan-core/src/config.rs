//! Global youthplan configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::completion::CompletionSettings;
use crate::error::{PlannerError, PlannerResult};

static DEFAULT_DATA_DIR: &str = "~/youthplan";
static DEFAULT_MODEL: &str = "gpt-3.5-turbo";
static DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Environment variable holding the completion API key. Never stored in the config file.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Configuration at ~/.config/youthplan/config.toml, overridable with
/// `YOUTHPLAN_*` environment variables (e.g. `YOUTHPLAN_DATA_DIR`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlannerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            data_dir: default_data_dir(),
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("youthplan");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template on first run.
    pub fn load() -> PlannerResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> PlannerResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("YOUTHPLAN"))
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlannerResult<()> {
        let contents = format!(
            "\
# youthplan configuration

# Where event data is stored:
# data_dir = \"{}\"

# Chat completion model and endpoint (OpenAI-compatible):
# model = \"{}\"
# api_base = \"{}\"
# temperature = {}

# The API key is read from the {} environment variable.
",
            DEFAULT_DATA_DIR, DEFAULT_MODEL, DEFAULT_API_BASE, DEFAULT_TEMPERATURE, API_KEY_ENV
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlannerError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlannerError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
