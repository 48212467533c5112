//! Error types for document and configuration I/O.
//!
//! The timeline engine itself never fails: bad dates and out-of-range
//! positions come back as `None`. Only the file boundary reports errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Document is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid date in '{field}': '{value}' (expected YYYY/MM/DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, Error>;
