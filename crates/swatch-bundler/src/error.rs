//! Error types for the routing and plugin stages.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {message}", .path.display())]
    Yaml { path: PathBuf, message: String },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("unknown template namespace '@{0}'")]
    UnknownNamespace(String),

    #[error("configuration error: {0}")]
    Config(#[from] swatch_config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
