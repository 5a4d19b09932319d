use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::core::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    FALLBACK_API_KEY_ENVS,
};

/// Errors that can occur while reading, parsing or editing the config file.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    NoConfigDir,

    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// `set`/`unset` was given a key the config does not have.
    UnknownKey(String),

    /// The value for a known key could not be parsed.
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path_display(path), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path_display(path), source)
            }
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                Config::KEYS.join(", ")
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value}")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// OpenAI-compatible endpoint root, e.g. Gemini's `/v1beta/openai`
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    /// "dark" or "light"
    pub theme: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "base-url",
        "model",
        "temperature",
        "api-key-env",
        "theme",
        "connect-timeout-secs",
    ];

    pub fn load() -> Result<Config, Box<dyn StdError>> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn StdError>> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Write through a temp file in the same directory, then rename.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "cuartocamino", "analista")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Set a value by its CLI key name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "base-url" => self.base_url = Some(value.to_string()),
            "model" => self.model = Some(value.to_string()),
            "temperature" => {
                let parsed: f32 = value.parse().map_err(|_| invalid())?;
                if !(0.0..=2.0).contains(&parsed) {
                    return Err(invalid());
                }
                self.temperature = Some(parsed);
            }
            "api-key-env" => self.api_key_env = Some(value.to_string()),
            "theme" => self.theme = Some(parse_theme(value).map_err(|_| invalid())?),
            "connect-timeout-secs" => {
                self.connect_timeout_secs = Some(value.parse().map_err(|_| invalid())?);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "base-url" => self.base_url = None,
            "model" => self.model = None,
            "temperature" => self.temperature = None,
            "api-key-env" => self.api_key_env = None,
            "theme" => self.theme = None,
            "connect-timeout-secs" => self.connect_timeout_secs = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn theme_or_default(&self) -> &str {
        self.theme.as_deref().unwrap_or("dark")
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Environment variables consulted for the API key, in order.
    pub fn api_key_envs(&self) -> Vec<&str> {
        let primary = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        let mut names = vec![primary];
        names.extend(FALLBACK_API_KEY_ENVS.iter().copied().filter(|n| *n != primary));
        names
    }

    /// First non-empty key found through `lookup` (normally `std::env::var`).
    pub fn resolve_api_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key_envs()
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
    }

    pub fn print_all(&self) {
        fn show<T: fmt::Display>(key: &str, value: Option<T>, default: impl fmt::Display) {
            match value {
                Some(value) => println!("  {key}: {value}"),
                None => println!("  {key}: {default} (default)"),
            }
        }

        println!("Current configuration:");
        show("base-url", self.base_url.as_deref(), DEFAULT_BASE_URL);
        show("model", self.model.as_deref(), DEFAULT_MODEL);
        show("temperature", self.temperature, DEFAULT_TEMPERATURE);
        show("api-key-env", self.api_key_env.as_deref(), DEFAULT_API_KEY_ENV);
        show("theme", self.theme.as_deref(), "dark");
        show("connect-timeout-secs", self.connect_timeout_secs, "none");
    }
}

/// Normalize a theme name. Only `dark` and `light` exist.
pub fn parse_theme(value: &str) -> Result<String, String> {
    let lower = value.trim().to_ascii_lowercase();
    match lower.as_str() {
        "dark" | "light" => Ok(lower),
        _ => Err(format!("unknown theme '{value}' (expected dark or light)")),
    }
}

/// Render a path with the home directory abbreviated to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            if let Ok(relative) = path.strip_prefix(PathBuf::from(home)) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
