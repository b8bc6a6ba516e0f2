use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub(crate) enum CliError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] foodshare_store_db::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Helper trait for adding context to IO errors
pub(crate) trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::io::Result<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|source| CliError::Io {
            context: context.into(),
            source,
        })
    }
}
