// Mincer - A placeholder-preserving HTML and XML minifier
//
// This library compacts markup while shielding literal regions behind
// placeholder tokens, with optional file and environment configuration.

// Re-export core functionality
pub use mincer_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use mincer_config;

/// Prelude for common imports
pub mod prelude {
    pub use mincer_core::{
        Compressor, HtmlCompressor, HtmlCompressorBuilder, HtmlCompressorConfig, MincerError,
        Minifier, SurroundingSpaces, XmlCompressor, XmlCompressorConfig,
    };

    #[cfg(feature = "config")]
    pub use mincer_config::{ConfigManager, FileFormat, Section};
}
