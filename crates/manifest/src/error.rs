//! Error types for the manifest crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading manifests
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest file could not be read
    #[error("error reading manifest file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file is not valid YAML
    #[error("cannot parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document in the file is not a usable resource
    #[error("invalid document in {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// Why a single manifest document could not be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Required field is absent
    #[error("missing field {0}")]
    MissingField(&'static str),

    /// Field exists but is not a string
    #[error("field {0} must be a string")]
    NotAString(&'static str),

    /// No registered resource family can decode this kind
    #[error("no resource family recognizes {api_version}/{kind}")]
    Unrecognized { api_version: String, kind: String },
}

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;
