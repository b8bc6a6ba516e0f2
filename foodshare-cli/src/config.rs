use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

fn default_database() -> PathBuf {
    PathBuf::from("food_wastage.db")
}

fn default_log_level() -> String {
    "info".into()
}

fn default_city() -> String {
    "Delhi".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default = "default_database")]
    pub(crate) database: PathBuf,
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,
    #[serde(default)]
    pub(crate) enforce_foreign_keys: bool,
    /// City bound to the provider contact query when running the full report
    #[serde(default = "default_city")]
    pub(crate) default_city: String,
    #[serde(default)]
    pub(crate) read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            log_level: default_log_level(),
            enforce_foreign_keys: false,
            default_city: default_city(),
            read_only: false,
        }
    }
}

impl Config {
    pub(crate) fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    pub(crate) fn parse(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "database must not be empty".to_string(),
            }
            .into());
        }
        if self.default_city.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "default_city must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Resolve settings from `explicit`, `FOODSHARE_CONFIG`, or `settings.toml`
/// in the working directory, falling back to defaults. `FOODSHARE_DB`
/// overrides the database path.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config> {
    let mut settings = match explicit {
        Some(path) => Config::load(path)?,
        None => match std::env::var("FOODSHARE_CONFIG") {
            Ok(settings_file) => Config::load(Path::new(&settings_file))?,
            Err(_) => {
                if Path::new("settings.toml").exists() {
                    Config::load(Path::new("settings.toml"))?
                } else {
                    Config::default()
                }
            }
        },
    };

    if let Some(db) = std::env::var_os("FOODSHARE_DB") {
        settings.database = PathBuf::from(db);
        settings.validate()?;
    }
    Ok(settings)
}
