//! XML compressor

use crate::config::XmlCompressorConfig;
use crate::patterns::{MULTISPACE, TAG_PROPERTY, XML_CDATA, XML_COMMENT};
use crate::placeholder::{BlockStore, Category, Decision};
use crate::residual::{remove_intertag_spaces, rewrite_tags, rewrite_unquoted, trim_tag_end};
use std::borrow::Cow;
use tracing::debug;

/// Whitespace and comment remover for XML documents.
///
/// `<![CDATA[...]]>` sections pass through byte for byte.
///
/// ```
/// use mincer_core::XmlCompressor;
///
/// let xml = "<root>\n  <!-- note -->\n  <item  id = \"1\" />\n</root>";
/// assert_eq!(XmlCompressor::new().compress(xml), r#"<root><item id="1"/></root>"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlCompressor {
    config: XmlCompressorConfig,
}

impl XmlCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: XmlCompressorConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> XmlCompressorBuilder {
        XmlCompressorBuilder::default()
    }

    pub fn config(&self) -> &XmlCompressorConfig {
        &self.config
    }

    /// Compress `xml`. Disabled compressors and empty input return the input.
    pub fn compress(&self, xml: &str) -> String {
        if !self.config.enabled || xml.is_empty() {
            return xml.to_string();
        }

        let mut store = BlockStore::for_source(xml);
        let document = store.extract(xml, &XML_CDATA, |caps| Decision::Whole {
            category: Category::Cdata,
            content: caps[0].to_string(),
        });
        let mut document = store.escape_percent(&document);

        if self.config.remove_comments {
            document = XML_COMMENT.replace_all(&document, "").into_owned();
        }
        if self.config.remove_intertag_spaces {
            document = remove_intertag_spaces(&document).into_owned();
        }
        document = remove_spaces_inside_tags(&document);

        let output = store.restore(document.trim());
        debug!(original = xml.len(), compressed = output.len(), "compressed xml");
        output
    }
}

fn remove_spaces_inside_tags(xml: &str) -> String {
    rewrite_tags(xml, |tag| {
        let tag = rewrite_unquoted(tag, |run| {
            let collapsed = MULTISPACE.replace_all(run, " ");
            Cow::Owned(TAG_PROPERTY.replace_all(&collapsed, "${1}=").into_owned())
        });
        Cow::Owned(trim_tag_end(&tag).into_owned())
    })
}

/// Builder for [`XmlCompressor`]
#[derive(Debug, Clone, Default)]
pub struct XmlCompressorBuilder {
    config: XmlCompressorConfig,
}

impl XmlCompressorBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn remove_comments(mut self, remove: bool) -> Self {
        self.config.remove_comments = remove;
        self
    }

    pub fn remove_intertag_spaces(mut self, remove: bool) -> Self {
        self.config.remove_intertag_spaces = remove;
        self
    }

    pub fn build(self) -> XmlCompressor {
        XmlCompressor::with_config(self.config)
    }
}
