//! # Herald Configuration Errors
//!
//! [`ConfigError`] covers reading, parsing and applying listener manifests.
use std::path::PathBuf;

use thiserror::Error;

use crate::error::{BoxError, DispatcherError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported manifest format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Deserialization from '{format}' failed: {source}")]
    Deserialization {
        format: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Manifest entry #{index} for event '{event}' was rejected: {source}")]
    Registration {
        index: usize,
        event: String,
        #[source]
        source: DispatcherError,
    },
}
