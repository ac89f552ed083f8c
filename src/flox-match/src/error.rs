//! Error types for the fallible outer layers
//!
//! Matching itself never fails; only settings parsing and config loading do.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading settings or configuration
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown search precision: {0:?} (expected Regular, Low or None)")]
    UnknownPrecision(String),

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
