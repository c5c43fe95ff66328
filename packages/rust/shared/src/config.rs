//! Application configuration for pageforge.
//!
//! User config lives at `~/.pageforge/pageforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PageForgeError, Result};
use crate::types::Language;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pageforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pageforge";

/// Lower bound for the per-article word count.
pub const MIN_CONTENT_WORDS: u32 = 100;

/// Upper bound for the per-article word count.
pub const MAX_CONTENT_WORDS: u32 = 2000;

// ---------------------------------------------------------------------------
// Config structs (matching pageforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// OpenAI-compatible synthesis backend settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Article language applied to every keyword of a run.
    #[serde(default)]
    pub language: Language,

    /// Desired article length in words.
    #[serde(default = "default_content_length")]
    pub content_length: u32,

    /// File name the finalized archive is offered under.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Write the JSON descriptor even when content generation failed.
    #[serde(default = "default_true")]
    pub descriptor_on_failure: bool,

    /// Minimum ms between synthesizer calls (0 disables the delay).
    #[serde(default)]
    pub rate_limit_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            content_length: default_content_length(),
            archive_name: default_archive_name(),
            descriptor_on_failure: true,
            rate_limit_ms: 0,
        }
    }
}

fn default_content_length() -> u32 {
    800
}
fn default_archive_name() -> String {
    "generated-pages.zip".into()
}
fn default_true() -> bool {
    true
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to request for article synthesis.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1".into()
}

// ---------------------------------------------------------------------------
// Request template (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Per-run generation parameters, shared across all keywords.
///
/// Constructed once per run; only the keyword varies between synthesizer
/// invocations.
#[derive(Debug, Clone, Copy)]
pub struct RequestTemplate {
    /// Target article language.
    pub language: Language,
    /// Desired article length in words.
    pub content_length: u32,
}

impl From<&AppConfig> for RequestTemplate {
    fn from(config: &AppConfig) -> Self {
        Self {
            language: config.defaults.language,
            content_length: config.defaults.content_length,
        }
    }
}

/// Check that a word count lies within the supported range.
pub fn validate_content_length(words: u32) -> Result<u32> {
    if (MIN_CONTENT_WORDS..=MAX_CONTENT_WORDS).contains(&words) {
        Ok(words)
    } else {
        Err(PageForgeError::config(format!(
            "content_length {words} out of range [{MIN_CONTENT_WORDS}, {MAX_CONTENT_WORDS}]"
        )))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pageforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PageForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pageforge/pageforge.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| PageForgeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PageForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_content_length(config.defaults.content_length)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PageForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PageForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PageForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the synthesis API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.openai.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(PageForgeError::config(format!(
            "synthesis API key not found. Set the {var_name} environment variable, \
             or pass --offline to use the built-in stub synthesizer."
        ))),
    }
}
