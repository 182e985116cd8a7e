// Error types for configuration loading

use mincer_core::MincerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Compressor configuration error: {0}")]
    Compressor(#[from] MincerError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
