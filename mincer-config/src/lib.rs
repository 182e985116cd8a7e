//! Configuration loading for Mincer compressors
//!
//! Settings come from JSON or TOML files with `[html]` and `[xml]`
//! sections, from `.env` files and from `MINCER_HTML_*` / `MINCER_XML_*`
//! environment variables. Sources are merged key by key in load order, the
//! last one winning.
//!
//! ```
//! use mincer_config::{ConfigManager, FileFormat};
//!
//! let mut manager = ConfigManager::new();
//! manager
//!     .load_str("[html]\nremove_intertag_spaces = true\n", FileFormat::Toml)
//!     .unwrap();
//!
//! let compressor = manager.html_compressor().unwrap();
//! assert_eq!(compressor.compress("<div>  <p>x</p>  </div>"), "<div><p>x</p></div>");
//! ```

pub mod env;
pub mod error;
pub mod loader;

pub use env::{DEFAULT_PREFIX, EnvLoader, coerce};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use mincer_core::{HtmlCompressor, HtmlCompressorConfig, XmlCompressor, XmlCompressorConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Top-level section a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Html,
    Xml,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Html => "html",
            Section::Xml => "xml",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "html" => Some(Section::Html),
            "xml" => Some(Section::Xml),
            _ => None,
        }
    }

    /// Split `html_remove_quotes` into its section and key
    fn split_key(key: &str) -> Option<(Self, &str)> {
        let (section, rest) = key.split_once('_')?;
        Some((Self::parse(section)?, rest))
    }
}

/// Merged configuration from files and the environment
#[derive(Debug, Clone)]
pub struct ConfigManager {
    html: Map<String, Value>,
    xml: Map<String, Value>,
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager reading `MINCER_*` variables
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            html: Map::new(),
            xml: Map::new(),
            env_prefix: prefix.into(),
        }
    }

    /// Load configuration from environment variables
    pub fn load_env(&mut self) -> Result<()> {
        let loader = EnvLoader::new(Some(self.env_prefix.clone()));
        let vars = loader.load()?;
        self.apply_env(vars);
        Ok(())
    }

    /// Load configuration from .env file
    pub fn load_dotenv(&mut self, path: Option<&str>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok(); // Ignore if .env doesn't exist
        }
        self.load_env()
    }

    /// Load configuration from a file, detecting its format
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let data = loader.load_file(path)?;
        debug!(path = %path.display(), format = ?loader.format(), "loaded configuration file");
        self.apply(data, loader.format())
    }

    /// Load configuration from a string in the given format
    pub fn load_str(&mut self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        self.apply(data, format)
    }

    /// Set a single value
    pub fn set<T: Serialize>(&mut self, section: Section, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::InvalidValue {
            key: format!("{}.{}", section.name(), key),
            message: e.to_string(),
        })?;
        self.section_mut(section).insert(key.to_string(), value);
        Ok(())
    }

    /// Raw value of one key
    pub fn get(&self, section: Section, key: &str) -> Option<&Value> {
        self.section(section).get(key)
    }

    pub fn has(&self, section: Section, key: &str) -> bool {
        self.section(section).contains_key(key)
    }

    /// Keys set in one section
    pub fn keys(&self, section: Section) -> Vec<String> {
        self.section(section).keys().cloned().collect()
    }

    /// Merge configuration from another manager; its values win
    pub fn merge(&mut self, other: &ConfigManager) {
        for section in [Section::Html, Section::Xml] {
            let values = other.section(section).clone();
            self.section_mut(section).extend(values);
        }
    }

    /// Settings for the HTML compressor, defaults filled in
    pub fn html_config(&self) -> Result<HtmlCompressorConfig> {
        self.deserialize(Section::Html)
    }

    /// Settings for the XML compressor, defaults filled in
    pub fn xml_config(&self) -> Result<XmlCompressorConfig> {
        self.deserialize(Section::Xml)
    }

    /// Build an HTML compressor from the merged settings
    pub fn html_compressor(&self) -> Result<HtmlCompressor> {
        Ok(HtmlCompressor::from_config(self.html_config()?)?)
    }

    /// Build an XML compressor from the merged settings
    pub fn xml_compressor(&self) -> Result<XmlCompressor> {
        Ok(XmlCompressor::with_config(self.xml_config()?))
    }

    fn section(&self, section: Section) -> &Map<String, Value> {
        match section {
            Section::Html => &self.html,
            Section::Xml => &self.xml,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Map<String, Value> {
        match section {
            Section::Html => &mut self.html,
            Section::Xml => &mut self.xml,
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, section: Section) -> Result<T> {
        serde_json::from_value(Value::Object(self.section(section).clone())).map_err(|e| {
            ConfigError::DeserializationError(format!("[{}] {}", section.name(), e))
        })
    }

    fn apply(&mut self, data: Value, format: FileFormat) -> Result<()> {
        let Value::Object(map) = data else {
            return Err(ConfigError::ParseError(
                "Configuration root must be a table".to_string(),
            ));
        };

        if format == FileFormat::Env {
            let loader = EnvLoader::new(Some(self.env_prefix.clone()));
            let vars = map.into_iter().filter_map(|(key, value)| match value {
                Value::String(value) => Some((key, value)),
                _ => None,
            });
            self.apply_env(loader.filter(vars));
            return Ok(());
        }

        for (name, value) in map {
            let Some(section) = Section::parse(&name) else {
                warn!(key = %name, "ignoring configuration key outside [html] and [xml]");
                continue;
            };
            let Value::Object(values) = value else {
                return Err(ConfigError::InvalidValue {
                    key: name,
                    message: "expected a table".to_string(),
                });
            };
            self.section_mut(section).extend(values);
        }

        Ok(())
    }

    fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, raw) in vars {
            let Some((section, field)) = Section::split_key(&key) else {
                debug!(key = %key, "ignoring environment key without a section");
                continue;
            };

            let mut value = coerce(&raw);
            // A single pattern may be given without array syntax
            if field == "custom_preserve_patterns" && value.is_string() {
                value = Value::Array(vec![value]);
            }
            self.section_mut(section).insert(field.to_string(), value);
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
