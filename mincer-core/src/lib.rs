//! # Mincer Core
//!
//! Placeholder-preserving minification for HTML and XML.
//!
//! ## Features
//!
//! - ✅ **Protected Regions** - `pre`, `textarea`, scripts, styles, event
//!   handlers, skip blocks and custom patterns survive byte for byte
//! - ✅ **Conditional Comments** - Inner markup is compressed recursively
//! - ✅ **Residual Passes** - Comments, whitespace, default attributes,
//!   quotes and protocols, each behind its own switch
//! - ✅ **Pluggable Minifiers** - JavaScript and CSS strategies behind the
//!   [`Minifier`] trait, with CDATA handling and failure isolation
//! - ✅ **Statistics** - Optional before/after size accounting
//! - ✅ **XML** - A smaller pipeline for XML documents
//!
//! ## Quick Start
//!
//! ```rust
//! use mincer_core::{HtmlCompressor, SurroundingSpaces};
//!
//! let compressor = HtmlCompressor::builder()
//!     .remove_intertag_spaces(true)
//!     .remove_surrounding_spaces(SurroundingSpaces::Max)
//!     .compress_css(true)
//!     .build()
//!     .unwrap();
//!
//! let html = "<html>\n  <head>\n    <style> p { color: red; } </style>\n  </head>\n</html>";
//! assert_eq!(
//!     compressor.compress(html),
//!     "<html><head><style>p{color:red}</style></head></html>"
//! );
//! ```
//!
//! ## Preserving Custom Regions
//!
//! ```rust
//! use mincer_core::HtmlCompressor;
//!
//! let compressor = HtmlCompressor::builder()
//!     .preserve_php(true)
//!     .preserve_pattern(r"\{\{.*?\}\}")
//!     .build()
//!     .unwrap();
//!
//! let html = "<p>  <?php  echo $a;  ?>  {{  name  }}  </p>";
//! assert_eq!(compressor.compress(html), "<p> <?php  echo $a;  ?> {{  name  }} </p>");
//! ```
//!
//! ## Custom Minifiers
//!
//! Any `Fn(&str) -> Result<String>` is a [`Minifier`]. A failing minifier
//! leaves its block untouched.
//!
//! ```rust
//! use mincer_core::{HtmlCompressor, MincerError, Result};
//! use std::sync::Arc;
//!
//! let failing = |_: &str| -> Result<String> { Err(MincerError::Minifier("no".into())) };
//!
//! let compressor = HtmlCompressor::builder()
//!     .compress_javascript(true)
//!     .javascript_minifier(Arc::new(failing))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(compressor.compress("<script> a  =  1 </script>"), "<script> a  =  1 </script>");
//! ```
//!
//! ## Statistics
//!
//! ```rust
//! use mincer_core::HtmlCompressor;
//!
//! let compressor = HtmlCompressor::new();
//! let (output, stats) = compressor.compress_with_statistics("<p>   hello   </p>");
//!
//! assert_eq!(output, "<p> hello </p>");
//! assert_eq!(stats.original_metrics.filesize, 18);
//! assert_eq!(stats.compressed_metrics.filesize, 14);
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod minifier;
pub mod patterns;
pub mod placeholder;
pub mod residual;
pub mod stats;
pub mod xml;

pub use config::{HtmlCompressorConfig, SurroundingSpaces, XmlCompressorConfig};
pub use error::{MincerError, Result};
pub use html::{HtmlCompressor, HtmlCompressorBuilder};
pub use minifier::{CssMinifier, JsMinifier, Minifier, minify_block};
pub use patterns::{
    ALL_TAGS, BLOCK_TAGS_MAX, BLOCK_TAGS_MIN, PHP_TAG_PATTERN, SERVER_SCRIPT_TAG_PATTERN,
    SERVER_SIDE_INCLUDE_PATTERN,
};
pub use stats::{CompressionStatistics, HtmlMetrics};
pub use xml::{XmlCompressor, XmlCompressorBuilder};

/// A markup compressor.
pub trait Compressor: Send + Sync {
    /// Compress `source`. Never fails; degraded cases return best-effort output.
    fn compress(&self, source: &str) -> String;
}

impl Compressor for HtmlCompressor {
    fn compress(&self, source: &str) -> String {
        HtmlCompressor::compress(self, source)
    }
}

impl Compressor for XmlCompressor {
    fn compress(&self, source: &str) -> String {
        XmlCompressor::compress(self, source)
    }
}
