//! Error type shared by the loader, the option parser and the generator.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Mode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load dictionary {path}: {message}")]
    Dictionary { path: PathBuf, message: String },

    #[error("invalid descriptor document: {0}")]
    Json(#[from] serde_json::Error),

    /// A field or method names a type that no loaded file declares.
    #[error("{file}: unresolved type {type_name} referenced by {referrer}")]
    UnresolvedType {
        file: String,
        referrer: String,
        type_name: String,
    },

    #[error("{file}: unknown $mode value {value:?} (expected file, package or none)")]
    UnknownMode { file: String, value: String },

    /// Two files of one package ask for different rendering modes.
    #[error(
        "all files in package {package} must have the same mode; \
         {first_file} sets {first:?} but {file} sets {second:?}"
    )]
    ModeConflict {
        package: String,
        first_file: String,
        first: Mode,
        file: String,
        second: Mode,
    },

    #[error("unknown generator option: {0}")]
    UnknownOption(String),

    #[error("invalid value {value:?} for option {key}")]
    InvalidOption { key: String, value: String },

    #[error("treating {0} warnings as errors")]
    WarningsAsErrors(usize),
}
