//! Error types for the compression pipeline

use thiserror::Error;

/// Errors raised while configuring a compressor or by a minifier strategy.
///
/// `compress` itself never fails; these surface from builders and from
/// [`Minifier`](crate::Minifier) implementations, whose failures are absorbed
/// at the delegation boundary.
#[derive(Error, Debug)]
pub enum MincerError {
    /// A custom preserve pattern failed to compile
    #[error("Invalid preserve pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Surrounding-space tag list is empty or contains a non-tag name
    #[error("Invalid surrounding-space tag list: {0}")]
    InvalidTagList(String),

    /// A minifier strategy could not process its input
    #[error("Minification failed: {0}")]
    Minifier(String),
}

pub type Result<T> = std::result::Result<T, MincerError>;
