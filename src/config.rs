//! Configuration for the command-line calculator.
//!
//! Two layers feed a run: [`Settings`], process-wide paths and defaults
//! taken from environment variables (or a `.env` file), and [`UserConfig`],
//! the per-user choices stored in `Config.json`. Command-line flags override
//! both.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_JSON: &str = "data/base.json";
const DEFAULT_CONFIG_JSON: &str = "data/Config.json";
const DEFAULT_LOG_DIR: &str = ".";
const DEFAULT_LOG_CONSOLE: bool = false;
const DEFAULT_BELT: &str = "green";
const DEFAULT_VERBOSE: bool = false;
const DEFAULT_OUTPUT_FOLDER: &str = "calculation trees";
const DEFAULT_PRODUCT: &str = "transport_belt";

/// Env file read by [`load_settings`], relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Errors raised while reading settings or the user config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("invalid env file {file}: {source}")]
    EnvFile {
        file: PathBuf,
        source: dotenvy::Error,
    },
}

/// Process-wide settings, overridable through the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Game data file (`BASE_JSON`)
    pub base_json: PathBuf,
    /// User config file (`CONFIG_JSON`)
    pub config_json: PathBuf,
    /// Directory for the log file (`LOG_DIR`)
    pub log_dir: PathBuf,
    /// Mirror log output to stderr (`LOG_CONSOLE`)
    pub log_console: bool,
    /// Belt used when the config names none (`DEFAULT_BELT`)
    pub default_belt: String,
    /// Verbose display when the config says nothing (`DEFAULT_VERBOSE`)
    pub default_verbose: bool,
    /// Folder for saved calculations (`OUTPUT_FOLDER`)
    pub output_folder: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_json: PathBuf::from(DEFAULT_BASE_JSON),
            config_json: PathBuf::from(DEFAULT_CONFIG_JSON),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_console: DEFAULT_LOG_CONSOLE,
            default_belt: DEFAULT_BELT.to_string(),
            default_verbose: DEFAULT_VERBOSE,
            output_folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
        }
    }
}

/// Reads [`Settings`] from the process environment, then [`ENV_FILE`].
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_layered(|key| std::env::var(key).ok(), Path::new(ENV_FILE))
}

/// Reads the `KEY=value` pairs of an env file; a missing file is empty.
///
/// The process environment is left untouched.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_error = |source| ConfigError::EnvFile {
        file: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(env_error(e)),
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(env_error)?;
        vars.insert(key, value);
    }
    debug!("Read {} variables from {}", vars.len(), path.display());
    Ok(vars)
}

/// Reads [`Settings`] through `lookup`, falling back to `env_file`.
///
/// A variable set through `lookup` always wins over the file.
pub fn load_settings_layered<F>(lookup: F, env_file: &Path) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_vars = read_env_file(env_file)?;
    load_settings_from(|key| lookup(key).or_else(|| file_vars.get(key).cloned()))
}

/// Reads [`Settings`] through `lookup`, starting from the defaults.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use factorio_calc::config::load_settings_from;
///
/// let env = HashMap::from([("DEFAULT_BELT", "blue"), ("LOG_CONSOLE", "yes")]);
/// let settings = load_settings_from(|key| env.get(key).map(|v| v.to_string())).unwrap();
///
/// assert_eq!(settings.default_belt, "blue");
/// assert!(settings.log_console);
/// assert!(!settings.default_verbose);
/// ```
pub fn load_settings_from<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Some(value) = non_empty(&lookup, "BASE_JSON") {
        settings.base_json = PathBuf::from(value);
    }
    if let Some(value) = non_empty(&lookup, "CONFIG_JSON") {
        settings.config_json = PathBuf::from(value);
    }
    if let Some(value) = non_empty(&lookup, "LOG_DIR") {
        settings.log_dir = PathBuf::from(value);
    }
    if let Some(value) = parse_bool_env(&lookup, "LOG_CONSOLE")? {
        settings.log_console = value;
    }
    if let Some(value) = non_empty(&lookup, "DEFAULT_BELT") {
        settings.default_belt = value;
    }
    if let Some(value) = parse_bool_env(&lookup, "DEFAULT_VERBOSE")? {
        settings.default_verbose = value;
    }
    if let Some(value) = non_empty(&lookup, "OUTPUT_FOLDER") {
        settings.output_folder = PathBuf::from(value);
    }

    Ok(settings)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool_env<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        None => Ok(None),
        Some(value) => parse_bool(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidEnv {
                key,
                value,
                expected: "a boolean (true/false/1/0/yes/no/on/off)",
            }),
    }
}

/// Parses the boolean spellings accepted in settings and config files.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A boolean written either as a JSON boolean or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(text)) => parse_bool(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a boolean, got '{}'", text))),
    }
}

/// Per-user choices from `Config.json`.
///
/// Every field is optional; [`UserConfig::resolve`] fills gaps from
/// [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub belt_color: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub verbose: Option<bool>,
    #[serde(default, rename = "consoleLogging", deserialize_with = "deserialize_flag")]
    pub console_logging: Option<bool>,
}

/// The effective choices for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub belt_color: String,
    pub product: String,
    pub verbose: bool,
    pub console_logging: bool,
}

impl UserConfig {
    /// Parses a `Config.json` document.
    pub fn from_json(json: &str, file: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            file: file.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Fills unset fields from `settings`.
    pub fn resolve(&self, settings: &Settings) -> RunConfig {
        RunConfig {
            belt_color: self
                .belt_color
                .clone()
                .unwrap_or_else(|| settings.default_belt.clone()),
            product: self
                .product
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            verbose: self.verbose.unwrap_or(settings.default_verbose),
            console_logging: self.console_logging.unwrap_or(settings.log_console),
        }
    }
}

/// Loads `Config.json` from `path`; a missing file yields the defaults.
pub fn load_user_config(path: &Path) -> Result<UserConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let config = UserConfig::from_json(&content, path)?;
            debug!(
                "Configuration loaded: belt_color={:?}, product={:?}, verbose={:?}, consoleLogging={:?}",
                config.belt_color, config.product, config.verbose, config.console_logging
            );
            Ok(config)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(UserConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            file: path.to_path_buf(),
            source,
        }),
    }
}
