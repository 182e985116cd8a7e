//! Compressor configuration

use crate::error::MincerError;
use crate::patterns::{ALL_TAGS, BLOCK_TAGS_MAX, BLOCK_TAGS_MIN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag set around which adjacent whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SurroundingSpaces {
    /// [`BLOCK_TAGS_MIN`]
    Min,
    /// [`BLOCK_TAGS_MAX`]
    Max,
    /// Every tag
    All,
    /// Caller supplied tag names
    Custom(Vec<String>),
}

impl FromStr for SurroundingSpaces {
    type Err = MincerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("min") || value.eq_ignore_ascii_case(BLOCK_TAGS_MIN) {
            return Ok(Self::Min);
        }
        if value.eq_ignore_ascii_case("max") || value.eq_ignore_ascii_case(BLOCK_TAGS_MAX) {
            return Ok(Self::Max);
        }
        if value.eq_ignore_ascii_case(ALL_TAGS) {
            return Ok(Self::All);
        }

        let tags: Vec<String> = value
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        if tags.is_empty() {
            return Err(MincerError::InvalidTagList(s.to_string()));
        }
        if let Some(bad) = tags
            .iter()
            .find(|tag| !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        {
            return Err(MincerError::InvalidTagList(format!("`{}` is not a tag name", bad)));
        }

        Ok(Self::Custom(tags))
    }
}

impl TryFrom<String> for SurroundingSpaces {
    type Error = MincerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SurroundingSpaces> for String {
    fn from(value: SurroundingSpaces) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SurroundingSpaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::All => write!(f, "{}", ALL_TAGS),
            Self::Custom(tags) => write!(f, "{}", tags.join(",")),
        }
    }
}

/// Settings for [`HtmlCompressor`](crate::HtmlCompressor).
///
/// A plain value: recursive runs share it by reference and nothing in the
/// pipeline mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlCompressorConfig {
    /// Master switch; a disabled compressor returns its input unchanged
    pub enabled: bool,

    /// Remove ordinary `<!-- -->` comments (conditional comments survive)
    pub remove_comments: bool,

    /// Collapse whitespace runs to a single space
    pub remove_multi_spaces: bool,

    /// Remove whitespace between tags
    pub remove_intertag_spaces: bool,

    /// Drop quotes around simple attribute values
    pub remove_quotes: bool,

    /// Keep line breaks as they are
    pub preserve_line_breaks: bool,

    /// Remove whitespace around the selected tags
    pub remove_surrounding_spaces: Option<SurroundingSpaces>,

    /// Replace any doctype with `<!DOCTYPE html>`
    pub simple_doctype: bool,

    /// Drop default `type`/`language` from `<script>`
    pub remove_script_attributes: bool,

    /// Drop default `type` from `<style>`
    pub remove_style_attributes: bool,

    /// Drop default `type` from stylesheet `<link>`
    pub remove_link_attributes: bool,

    /// Drop `method="get"` from `<form>`
    pub remove_form_attributes: bool,

    /// Drop `type="text"` from `<input>`
    pub remove_input_attributes: bool,

    /// `checked="checked"` becomes `checked`
    pub simple_boolean_attributes: bool,

    /// Strip `javascript:` from inline event handlers
    pub remove_javascript_protocol: bool,

    /// Strip `http:` from link-like attributes
    pub remove_http_protocol: bool,

    /// Strip `https:` from link-like attributes
    pub remove_https_protocol: bool,

    /// Run `<script>` contents through the JavaScript minifier
    pub compress_javascript: bool,

    /// Run `<style>` contents through the CSS minifier
    pub compress_css: bool,

    /// Record size statistics on every `compress` call
    pub generate_statistics: bool,

    /// Preserve `<?...?>` blocks
    pub preserve_php: bool,

    /// Preserve `<%...%>` blocks
    pub preserve_server_script: bool,

    /// Preserve `<!--#...-->` server side includes
    pub preserve_ssi: bool,

    /// Additional regular expressions whose matches are preserved verbatim,
    /// in priority order
    pub custom_preserve_patterns: Vec<String>,
}

impl Default for HtmlCompressorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_comments: true,
            remove_multi_spaces: true,
            remove_intertag_spaces: false,
            remove_quotes: false,
            preserve_line_breaks: false,
            remove_surrounding_spaces: None,
            simple_doctype: false,
            remove_script_attributes: false,
            remove_style_attributes: false,
            remove_link_attributes: false,
            remove_form_attributes: false,
            remove_input_attributes: false,
            simple_boolean_attributes: false,
            remove_javascript_protocol: false,
            remove_http_protocol: false,
            remove_https_protocol: false,
            compress_javascript: false,
            compress_css: false,
            generate_statistics: false,
            preserve_php: false,
            preserve_server_script: false,
            preserve_ssi: false,
            custom_preserve_patterns: Vec::new(),
        }
    }
}

impl HtmlCompressorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Every optional transformation switched on, surrounding spaces at
    /// the maximal block preset.
    pub fn aggressive() -> Self {
        Self {
            remove_intertag_spaces: true,
            remove_quotes: true,
            remove_surrounding_spaces: Some(SurroundingSpaces::Max),
            simple_doctype: true,
            remove_script_attributes: true,
            remove_style_attributes: true,
            remove_link_attributes: true,
            remove_form_attributes: true,
            remove_input_attributes: true,
            simple_boolean_attributes: true,
            remove_javascript_protocol: true,
            remove_http_protocol: true,
            remove_https_protocol: true,
            compress_javascript: true,
            compress_css: true,
            ..Self::default()
        }
    }
}

/// Settings for [`XmlCompressor`](crate::XmlCompressor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlCompressorConfig {
    /// Master switch
    pub enabled: bool,
    /// Remove `<!-- -->` comments
    pub remove_comments: bool,
    /// Remove whitespace between tags
    pub remove_intertag_spaces: bool,
}

impl Default for XmlCompressorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_comments: true,
            remove_intertag_spaces: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HtmlCompressorConfig::default();
        assert!(config.enabled);
        assert!(config.remove_comments);
        assert!(config.remove_multi_spaces);
        assert!(!config.remove_intertag_spaces);
        assert!(!config.compress_javascript);
        assert!(config.remove_surrounding_spaces.is_none());
        assert!(config.custom_preserve_patterns.is_empty());
    }

    #[test]
    fn test_aggressive_config() {
        let config = HtmlCompressorConfig::aggressive();
        assert!(config.remove_quotes);
        assert!(config.compress_css);
        assert!(!config.generate_statistics);
        assert_eq!(config.remove_surrounding_spaces, Some(SurroundingSpaces::Max));
    }

    #[test]
    fn test_surrounding_spaces_presets() {
        assert_eq!("min".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::Min);
        assert_eq!("MAX".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::Max);
        assert_eq!("all".parse::<SurroundingSpaces>().unwrap(), SurroundingSpaces::All);
        assert_eq!(
            BLOCK_TAGS_MIN.parse::<SurroundingSpaces>().unwrap(),
            SurroundingSpaces::Min
        );
        assert_eq!(
            BLOCK_TAGS_MAX.parse::<SurroundingSpaces>().unwrap(),
            SurroundingSpaces::Max
        );
    }

    #[test]
    fn test_surrounding_spaces_custom_list() {
        let parsed: SurroundingSpaces = "div, Span ,li".parse().unwrap();
        assert_eq!(
            parsed,
            SurroundingSpaces::Custom(vec!["div".into(), "span".into(), "li".into()])
        );
        assert_eq!(parsed.to_string(), "div,span,li");
    }

    #[test]
    fn test_surrounding_spaces_rejects_bad_lists() {
        assert!(" , ".parse::<SurroundingSpaces>().is_err());
        assert!("div,a|b".parse::<SurroundingSpaces>().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: HtmlCompressorConfig = serde_json::from_str(
            r#"{"remove_quotes": true, "remove_surrounding_spaces": "all"}"#,
        )
        .unwrap();

        assert!(config.remove_quotes);
        assert!(config.remove_comments);
        assert_eq!(config.remove_surrounding_spaces, Some(SurroundingSpaces::All));
    }

    #[test]
    fn test_xml_defaults() {
        let config = XmlCompressorConfig::default();
        assert!(config.enabled && config.remove_comments && config.remove_intertag_spaces);
    }
}
