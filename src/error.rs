use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning header text into signatures.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no loadable function prototypes found in {source_name}; the header is missing or its format is unrecognized")]
    NoSignatures { source_name: String },

    #[error("enumerant {name} has value `{value}`, expected a non-negative integer literal")]
    InvalidEnumerant { name: String, value: String },
}

/// Errors raised by the build-time generator. All of them are fatal.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("could not read the OpenGL API header {path}: {source}")]
    HeaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown platform `{0}` (expected linux, windows or macos)")]
    UnknownPlatform(String),

    #[error("could not read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised by the runtime loader. The caller may retry after either.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open the OpenGL library (tried {tried}): {reason}")]
    LibraryOpen { tried: String, reason: String },

    #[error("the function table is already loaded")]
    AlreadyLoaded,
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
