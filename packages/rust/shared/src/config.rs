//! Application configuration for BrandPitch.
//!
//! User config lives at `~/.brandpitch/brandpitch.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file, only the names of the env vars
//! that hold them.

use std::path::{Path, PathBuf};

use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::error::{BrandPitchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "brandpitch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".brandpitch";

// ---------------------------------------------------------------------------
// Config structs (matching brandpitch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenRouter (language model) settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Brandfetch (brand data provider) settings.
    #[serde(default)]
    pub brandfetch: BrandfetchConfig,

    /// Industry catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_openrouter_key_env")]
    pub api_key_env: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,

    /// Model used for both classification and copy generation.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for industry classification.
    #[serde(default = "default_classification_temperature")]
    pub classification_temperature: f64,

    /// Sampling temperature for copy generation.
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openrouter_key_env(),
            base_url: default_openrouter_base_url(),
            default_model: default_model(),
            timeout_secs: default_llm_timeout(),
            classification_temperature: default_classification_temperature(),
            generation_temperature: default_generation_temperature(),
        }
    }
}

impl OpenRouterConfig {
    /// Read the API key from the configured env var.
    pub fn api_key(&self) -> Result<Secret<String>> {
        read_api_key(&self.api_key_env, "OpenRouter", "https://openrouter.ai/keys")
    }
}

fn default_openrouter_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_llm_timeout() -> u64 {
    60
}
fn default_classification_temperature() -> f64 {
    0.3
}
fn default_generation_temperature() -> f64 {
    0.7
}

/// `[brandfetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandfetchConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_brandfetch_key_env")]
    pub api_key_env: String,

    /// Base URL of the brand lookup API.
    #[serde(default = "default_brandfetch_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_brandfetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for BrandfetchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_brandfetch_key_env(),
            base_url: default_brandfetch_base_url(),
            timeout_secs: default_brandfetch_timeout(),
        }
    }
}

impl BrandfetchConfig {
    /// Read the API key from the configured env var.
    pub fn api_key(&self) -> Result<Secret<String>> {
        read_api_key(
            &self.api_key_env,
            "Brandfetch",
            "https://developers.brandfetch.com",
        )
    }
}

fn default_brandfetch_key_env() -> String {
    "BRANDFETCH_API_KEY".into()
}
fn default_brandfetch_base_url() -> String {
    "https://api.brandfetch.io/v2".into()
}
fn default_brandfetch_timeout() -> u64 {
    10
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional path to a JSON catalog replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// Generation settings (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime model settings shared by the classifier and the generator.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Temperature for classification (determinism matters).
    pub classification_temperature: f64,
    /// Temperature for copy generation (creativity matters).
    pub generation_temperature: f64,
}

impl From<&AppConfig> for ModelSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.openrouter.default_model.clone(),
            classification_temperature: config.openrouter.classification_temperature,
            generation_temperature: config.openrouter.generation_temperature,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.brandpitch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BrandPitchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.brandpitch/brandpitch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BrandPitchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        BrandPitchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BrandPitchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BrandPitchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BrandPitchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a non-empty API key from `var_name`.
fn read_api_key(var_name: &str, service: &str, signup_url: &str) -> Result<Secret<String>> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(Secret::new(val)),
        _ => Err(BrandPitchError::config(format!(
            "{service} API key not found. Set the {var_name} environment variable.\n\
             Get a key at {signup_url}"
        ))),
    }
}
