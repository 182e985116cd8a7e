//! HTML compressor
//!
//! [`HtmlCompressor`] drives one run in four stages: protected spans are
//! swapped for placeholder tokens, the residual pipeline rewrites what is
//! left, script/style/event blocks are minified, and every block is put
//! back in the reverse order of extraction.
//!
//! Conditional comments are compressed recursively while they are being
//! extracted. The inner region goes through the same extraction and
//! residual stages with this compressor's settings, and its blocks land in
//! the run's store, so they are minified and restored with everything else.

use crate::config::{HtmlCompressorConfig, SurroundingSpaces};
use crate::minifier::{CssMinifier, JsMinifier, Minifier, minify_block};
use crate::patterns::*;
use crate::placeholder::{BlockStore, Category, Decision};
use crate::residual::ResidualPipeline;
use crate::stats::{CompressionStatistics, Recorder};
use crate::{MincerError, Result};
use parking_lot::Mutex;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How the content of a `<script>` element is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptKind {
    /// Minified when JavaScript compression is on
    JavaScript,
    /// Client side template, compressed with the surrounding markup
    Template,
    /// Any other type, kept byte for byte
    Other,
}

impl ScriptKind {
    fn of(open_tag: &str) -> Self {
        let Some(caps) = TYPE_ATTR.captures(open_tag) else {
            return Self::JavaScript;
        };
        let value = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str())
            .trim()
            .to_ascii_lowercase();

        match value.as_str() {
            "" | "text/javascript" | "application/javascript" => Self::JavaScript,
            "text/x-jquery-tmpl" => Self::Template,
            _ => Self::Other,
        }
    }
}

/// Placeholder-preserving HTML minifier.
///
/// Immutable once built, except for the last-run statistics record kept
/// when [`HtmlCompressorConfig::generate_statistics`] is set.
///
/// # Examples
///
/// ```
/// use mincer_core::HtmlCompressor;
///
/// let compressor = HtmlCompressor::builder()
///     .remove_intertag_spaces(true)
///     .remove_quotes(true)
///     .build()
///     .unwrap();
///
/// let html = "<div class=\"box\">\n  <pre>  keep  </pre>\n</div>";
/// assert_eq!(compressor.compress(html), "<div class=box><pre>  keep  </pre></div>");
/// ```
pub struct HtmlCompressor {
    config: HtmlCompressorConfig,
    preserve_patterns: Vec<Regex>,
    surrounding: Option<Regex>,
    javascript_minifier: Arc<dyn Minifier>,
    css_minifier: Arc<dyn Minifier>,
    last_statistics: Mutex<Option<CompressionStatistics>>,
}

impl HtmlCompressor {
    /// Compressor with default settings and the built-in minifiers.
    pub fn new() -> Self {
        Self {
            config: HtmlCompressorConfig::default(),
            preserve_patterns: Vec::new(),
            surrounding: None,
            javascript_minifier: Arc::new(JsMinifier),
            css_minifier: Arc::new(CssMinifier),
            last_statistics: Mutex::new(None),
        }
    }

    pub fn builder() -> HtmlCompressorBuilder {
        HtmlCompressorBuilder::new()
    }

    /// Build a compressor from a complete configuration.
    ///
    /// Fails if a custom preserve pattern does not compile or the
    /// surrounding-space tag list is empty.
    pub fn from_config(config: HtmlCompressorConfig) -> Result<Self> {
        HtmlCompressorBuilder::new().config(config).build()
    }

    pub fn config(&self) -> &HtmlCompressorConfig {
        &self.config
    }

    /// Compress `html`.
    ///
    /// Never fails. A disabled compressor or empty input returns the input
    /// unchanged.
    pub fn compress(&self, html: &str) -> String {
        if self.config.generate_statistics {
            return self.compress_with_statistics(html).0;
        }
        if self.is_identity(html) {
            return html.to_string();
        }

        let output = self.run(html, None);
        debug!(original = html.len(), compressed = output.len(), "compressed html");
        output
    }

    /// Compress `html` and collect statistics regardless of configuration.
    ///
    /// The record is also kept as the last-run statistics.
    pub fn compress_with_statistics(&self, html: &str) -> (String, CompressionStatistics) {
        let mut recorder = Recorder::start(html);
        let output = if self.is_identity(html) {
            html.to_string()
        } else {
            self.run(html, Some(&mut recorder))
        };
        let statistics = recorder.finish(&output);

        debug!(
            original = statistics.original_metrics.filesize,
            compressed = statistics.compressed_metrics.filesize,
            preserved = statistics.preserved_size,
            "compressed html"
        );
        *self.last_statistics.lock() = Some(statistics.clone());
        (output, statistics)
    }

    /// Statistics of the most recent call that collected them.
    pub fn statistics(&self) -> Option<CompressionStatistics> {
        self.last_statistics.lock().clone()
    }

    fn is_identity(&self, html: &str) -> bool {
        !self.config.enabled || html.is_empty()
    }

    fn run(&self, html: &str, mut recorder: Option<&mut Recorder>) -> String {
        let mut store = BlockStore::for_source(html);

        let document = self.compress_region(html, &mut store);
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.extracted(&store);
        }

        self.process_blocks(&mut store);
        if let Some(recorder) = recorder {
            recorder.processed(&store, &self.config);
        }

        store.restore(&document)
    }

    /// Extract protected spans of `html` into `store` and run the residual
    /// passes over what is left.
    fn compress_region(&self, html: &str, store: &mut BlockStore) -> String {
        let document = self.preserve_blocks(html, store);
        ResidualPipeline::new(&self.config, self.surrounding.as_ref()).run(&document)
    }

    fn preserve_blocks(&self, html: &str, store: &mut BlockStore) -> String {
        let mut document = html.to_string();

        for (position, pattern) in self.preserve_patterns.iter().enumerate() {
            let category = Category::User(position);
            document = store.extract(&document, pattern, |caps| Decision::Whole {
                category,
                content: caps[0].to_string(),
            });
            log_preserved(store, category);
        }

        // Skip markers are dropped, only their content survives
        document = store.extract(&document, &SKIP, |caps| Decision::Whole {
            category: Category::Skip,
            content: caps[1].to_string(),
        });
        log_preserved(store, Category::Skip);

        document = self.preserve_conditional_comments(&document, store);
        log_preserved(store, Category::ConditionalComment);

        document = store.extract_group(&document, &EVENT_DOUBLE_QUOTED, Category::Event, 2);
        document = store.extract_group(&document, &EVENT_SINGLE_QUOTED, Category::Event, 2);
        log_preserved(store, Category::Event);

        document = store.extract_group(&document, &PRE, Category::Pre, 2);
        log_preserved(store, Category::Pre);

        document = store.extract(&document, &SCRIPT, |caps| match ScriptKind::of(&caps[1]) {
            ScriptKind::JavaScript => Decision::Group {
                category: Category::Script,
                group: 2,
            },
            ScriptKind::Template => Decision::Keep,
            ScriptKind::Other => Decision::Group {
                category: Category::RawScript,
                group: 2,
            },
        });
        log_preserved(store, Category::Script);
        log_preserved(store, Category::RawScript);

        document = store.extract_group(&document, &STYLE, Category::Style, 2);
        log_preserved(store, Category::Style);

        document = store.extract_group(&document, &TEXTAREA, Category::TextArea, 2);
        log_preserved(store, Category::TextArea);

        if self.config.preserve_line_breaks {
            document = store.extract(&document, &LINE_BREAK, |caps| Decision::Whole {
                category: Category::LineBreak,
                content: caps[1].to_string(),
            });
            log_preserved(store, Category::LineBreak);
        }

        store.escape_percent(&document)
    }

    /// Replace each conditional comment with a token for its compressed
    /// form. The body is compressed into the same store, so its own blocks
    /// are stored ahead of the comment that refers to them. Opening and
    /// closing markers are kept as they are.
    fn preserve_conditional_comments(&self, document: &str, store: &mut BlockStore) -> String {
        let mut output = String::with_capacity(document.len());
        let mut last = 0;

        for caps in CONDITIONAL_COMMENT.captures_iter(document) {
            let Some(whole) = caps.get(0) else { continue };
            let body = &caps[2];
            if body.trim().is_empty() {
                continue;
            }

            let inner = self.compress_region(body, store);
            let content = format!("{}{}{}", &caps[1], inner, &caps[3]);
            output.push_str(&document[last..whole.start()]);
            output.push_str(&store.push(Category::ConditionalComment, content));
            last = whole.end();
        }

        output.push_str(&document[last..]);
        output
    }

    fn process_blocks(&self, store: &mut BlockStore) {
        if self.config.compress_javascript {
            let minifier = self.javascript_minifier.as_ref();
            store.transform(Category::Script, |block| minify_block(minifier, block));
        }

        if self.config.compress_css {
            let minifier = self.css_minifier.as_ref();
            store.transform(Category::Style, |block| minify_block(minifier, block));
        }

        if self.config.remove_javascript_protocol {
            store.transform(Category::Event, |block| {
                EVENT_JS_PROTOCOL.replace(block, "${1}").into_owned()
            });
        }
    }
}

impl Default for HtmlCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlCompressor")
            .field("config", &self.config)
            .field("preserve_patterns", &self.preserve_patterns.len())
            .field("javascript_minifier", &self.javascript_minifier.name())
            .field("css_minifier", &self.css_minifier.name())
            .finish()
    }
}

fn log_preserved(store: &BlockStore, category: Category) {
    let count = store.blocks(category).len();
    if count > 0 {
        debug!(category = %category, count, "preserved blocks");
    }
}

/// Builder for [`HtmlCompressor`]
pub struct HtmlCompressorBuilder {
    config: HtmlCompressorConfig,
    preserve_regexes: Vec<Regex>,
    javascript_minifier: Option<Arc<dyn Minifier>>,
    css_minifier: Option<Arc<dyn Minifier>>,
}

impl HtmlCompressorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: HtmlCompressorConfig::default(),
            preserve_regexes: Vec::new(),
            javascript_minifier: None,
            css_minifier: None,
        }
    }

    /// Replace every setting at once
    pub fn config(mut self, config: HtmlCompressorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn remove_comments(mut self, remove: bool) -> Self {
        self.config.remove_comments = remove;
        self
    }

    pub fn remove_multi_spaces(mut self, remove: bool) -> Self {
        self.config.remove_multi_spaces = remove;
        self
    }

    pub fn remove_intertag_spaces(mut self, remove: bool) -> Self {
        self.config.remove_intertag_spaces = remove;
        self
    }

    pub fn remove_quotes(mut self, remove: bool) -> Self {
        self.config.remove_quotes = remove;
        self
    }

    pub fn preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.config.preserve_line_breaks = preserve;
        self
    }

    /// Remove whitespace around the given tag set
    pub fn remove_surrounding_spaces(mut self, tags: SurroundingSpaces) -> Self {
        self.config.remove_surrounding_spaces = Some(tags);
        self
    }

    pub fn simple_doctype(mut self, simple: bool) -> Self {
        self.config.simple_doctype = simple;
        self
    }

    pub fn remove_script_attributes(mut self, remove: bool) -> Self {
        self.config.remove_script_attributes = remove;
        self
    }

    pub fn remove_style_attributes(mut self, remove: bool) -> Self {
        self.config.remove_style_attributes = remove;
        self
    }

    pub fn remove_link_attributes(mut self, remove: bool) -> Self {
        self.config.remove_link_attributes = remove;
        self
    }

    pub fn remove_form_attributes(mut self, remove: bool) -> Self {
        self.config.remove_form_attributes = remove;
        self
    }

    pub fn remove_input_attributes(mut self, remove: bool) -> Self {
        self.config.remove_input_attributes = remove;
        self
    }

    pub fn simple_boolean_attributes(mut self, simple: bool) -> Self {
        self.config.simple_boolean_attributes = simple;
        self
    }

    pub fn remove_javascript_protocol(mut self, remove: bool) -> Self {
        self.config.remove_javascript_protocol = remove;
        self
    }

    pub fn remove_http_protocol(mut self, remove: bool) -> Self {
        self.config.remove_http_protocol = remove;
        self
    }

    pub fn remove_https_protocol(mut self, remove: bool) -> Self {
        self.config.remove_https_protocol = remove;
        self
    }

    pub fn compress_javascript(mut self, compress: bool) -> Self {
        self.config.compress_javascript = compress;
        self
    }

    pub fn compress_css(mut self, compress: bool) -> Self {
        self.config.compress_css = compress;
        self
    }

    pub fn generate_statistics(mut self, generate: bool) -> Self {
        self.config.generate_statistics = generate;
        self
    }

    /// Preserve `<?...?>` blocks
    pub fn preserve_php(mut self, preserve: bool) -> Self {
        self.config.preserve_php = preserve;
        self
    }

    /// Preserve `<%...%>` blocks
    pub fn preserve_server_script(mut self, preserve: bool) -> Self {
        self.config.preserve_server_script = preserve;
        self
    }

    /// Preserve `<!--#...-->` includes
    pub fn preserve_ssi(mut self, preserve: bool) -> Self {
        self.config.preserve_ssi = preserve;
        self
    }

    /// Add a custom preserve pattern, compiled by [`build`](Self::build)
    pub fn preserve_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.custom_preserve_patterns.push(pattern.into());
        self
    }

    /// Add an already compiled preserve pattern, after all string patterns
    pub fn preserve_regex(mut self, pattern: Regex) -> Self {
        self.preserve_regexes.push(pattern);
        self
    }

    /// Use a custom JavaScript minifier
    pub fn javascript_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.javascript_minifier = Some(minifier);
        self
    }

    /// Use a custom CSS minifier
    pub fn css_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.css_minifier = Some(minifier);
        self
    }

    /// Compile every pattern and build the compressor
    pub fn build(self) -> Result<HtmlCompressor> {
        let config = self.config;

        let mut preserve_patterns = Vec::new();
        if config.preserve_php {
            preserve_patterns.push(PHP_TAG_PATTERN.clone());
        }
        if config.preserve_server_script {
            preserve_patterns.push(SERVER_SCRIPT_TAG_PATTERN.clone());
        }
        if config.preserve_ssi {
            preserve_patterns.push(SERVER_SIDE_INCLUDE_PATTERN.clone());
        }
        for pattern in &config.custom_preserve_patterns {
            let regex = Regex::new(pattern).map_err(|source| MincerError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            preserve_patterns.push(regex);
        }
        preserve_patterns.extend(self.preserve_regexes);

        let surrounding = match &config.remove_surrounding_spaces {
            None => None,
            Some(SurroundingSpaces::Min) => Some(SURROUNDING_SPACES_MIN.clone()),
            Some(SurroundingSpaces::Max) => Some(SURROUNDING_SPACES_MAX.clone()),
            Some(SurroundingSpaces::All) => Some(SURROUNDING_SPACES_ALL.clone()),
            Some(SurroundingSpaces::Custom(tags)) => {
                if tags.is_empty() {
                    return Err(MincerError::InvalidTagList(String::new()));
                }
                let list = tags.join(",");
                let regex = surrounding_spaces_regex(&list)
                    .map_err(|source| MincerError::InvalidPattern { pattern: list, source })?;
                Some(regex)
            }
        };

        debug!(
            preserve_patterns = preserve_patterns.len(),
            surrounding = ?config.remove_surrounding_spaces,
            "built html compressor"
        );

        Ok(HtmlCompressor {
            config,
            preserve_patterns,
            surrounding,
            javascript_minifier: self.javascript_minifier.unwrap_or_else(|| Arc::new(JsMinifier)),
            css_minifier: self.css_minifier.unwrap_or_else(|| Arc::new(CssMinifier)),
            last_statistics: Mutex::new(None),
        })
    }
}

impl Default for HtmlCompressorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn compressor(builder: HtmlCompressorBuilder) -> HtmlCompressor {
        builder.build().unwrap()
    }

    #[test]
    fn test_identity() {
        let disabled = compressor(HtmlCompressor::builder().enabled(false));
        let html = "<div>   <!-- c -->   </div>";
        assert_eq!(disabled.compress(html), html);
        assert_eq!(HtmlCompressor::new().compress(""), "");
    }

    #[test]
    fn test_default_compress() {
        let html = "<div>\n    <!-- c -->\n    <p>Hello   world</p>\n</div>\n";
        assert_eq!(HtmlCompressor::new().compress(html), "<div> <p>Hello world</p> </div>");
    }

    #[test]
    fn test_script_kind() {
        assert_eq!(ScriptKind::of("<script>"), ScriptKind::JavaScript);
        assert_eq!(
            ScriptKind::of(r#"<script type="text/javascript">"#),
            ScriptKind::JavaScript
        );
        assert_eq!(
            ScriptKind::of("<script type='Application/JavaScript'>"),
            ScriptKind::JavaScript
        );
        assert_eq!(
            ScriptKind::of(r#"<script type="text/x-jquery-tmpl">"#),
            ScriptKind::Template
        );
        assert_eq!(
            ScriptKind::of("<script type=text/template id=t>"),
            ScriptKind::Other
        );
    }

    #[test]
    fn test_pre_and_textarea_preserved() {
        let compressor = compressor(HtmlCompressor::builder().remove_intertag_spaces(true));
        let html = "<div>  <pre>\n  a   b\n</pre>  <textarea>  x \n y </textarea>  </div>";
        assert_eq!(
            compressor.compress(html),
            "<div><pre>\n  a   b\n</pre><textarea>  x \n y </textarea></div>"
        );
    }

    #[test]
    fn test_skip_block_kept_verbatim() {
        let html = "<p>  a  </p><!-- {{{ --><p>  b  </p><!-- }}} -->";
        assert_eq!(HtmlCompressor::new().compress(html), "<p> a </p><p>  b  </p>");
    }

    #[test]
    fn test_unknown_script_type_kept_verbatim() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let minifier = move |source: &str| -> Result<String> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(source.trim().to_string())
        };

        let compressor = compressor(
            HtmlCompressor::builder()
                .compress_javascript(true)
                .javascript_minifier(Arc::new(minifier)),
        );
        let html = "<script type=\"text/template\">  <b>  x  </b>  </script>";
        assert_eq!(compressor.compress(html), html);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_script_in_template_restored() {
        let html = "<script type=\"text/template\"><pre> a </pre></script>";
        assert_eq!(HtmlCompressor::new().compress(html), html);
    }

    #[test]
    fn test_javascript_and_css_minified() {
        let compressor = compressor(
            HtmlCompressor::builder()
                .compress_javascript(true)
                .compress_css(true),
        );
        let html = "<style> p { color: red; } </style><script> var a = 1 ; </script>";
        assert_eq!(
            compressor.compress(html),
            "<style>p{color:red}</style><script>var a=1;</script>"
        );
    }

    #[test]
    fn test_javascript_protocol_removed_from_events() {
        let compressor = compressor(HtmlCompressor::builder().remove_javascript_protocol(true));
        let html = r#"<a onclick="javascript:go()" onmouseover='javascript: stop()'>x</a>"#;
        assert_eq!(
            compressor.compress(html),
            r#"<a onclick="go()" onmouseover='stop()'>x</a>"#
        );
    }

    #[test]
    fn test_event_handlers_untouched_by_spacing() {
        let html = r#"<a onclick="if (a  ==  b) go()">x</a>"#;
        assert_eq!(HtmlCompressor::new().compress(html), html);
    }

    #[test]
    fn test_preserve_line_breaks() {
        let compressor = compressor(HtmlCompressor::builder().preserve_line_breaks(true));
        let html = "<p>a</p>  \n  <p>b</p>\r\n<p>c</p>";
        assert_eq!(compressor.compress(html), "<p>a</p>\n<p>b</p>\r\n<p>c</p>");
    }

    #[test]
    fn test_conditional_comment_recursion() {
        let html = "<!--[if IE]><div>   </div><!--[endif]-->";
        assert_eq!(
            HtmlCompressor::new().compress(html),
            "<!--[if IE]><div> </div><!--[endif]-->"
        );
    }

    #[test]
    fn test_conditional_comment_keeps_outer_user_blocks() {
        let compressor = compressor(HtmlCompressor::builder().preserve_php(true));
        let html = "<!--[if IE]><p>  <?php  echo 1; ?>  </p><![endif]-->";
        assert_eq!(
            compressor.compress(html),
            "<!--[if IE]><p> <?php  echo 1; ?> </p><![endif]-->"
        );
    }

    #[test]
    fn test_comment_removal_cannot_forge_placeholders() {
        let html = "<p>%%%~COMPRESS<!-- x -->~PRE~0~%%%</p><pre>secret</pre>";
        assert_eq!(
            HtmlCompressor::new().compress(html),
            "<p>%%%~COMPRESS~PRE~0~%%%</p><pre>secret</pre>"
        );
    }

    #[test]
    fn test_conditional_comment_cannot_forge_placeholders() {
        let html = "<!--[if IE]><p>%%%~COMPRESS<!-- x -->~PRE~0~%%%</p><![endif]--><pre>secret</pre>";
        assert_eq!(
            HtmlCompressor::new().compress(html),
            "<!--[if IE]><p>%%%~COMPRESS~PRE~0~%%%</p><![endif]--><pre>secret</pre>"
        );
    }

    #[test]
    fn test_percent_text_keeps_spacing() {
        let compressor = compressor(HtmlCompressor::builder().remove_intertag_spaces(true));
        let html = "<p>\n  <b>a</b> % b\n</p><div style=\"width: 50%\">  100%  </div>";
        assert_eq!(
            compressor.compress(html),
            "<p><b>a</b> % b </p><div style=\"width: 50%\"> 100% </div>"
        );
    }

    #[test]
    fn test_minifier_output_dropping_placeholders_is_discarded() {
        let replace_all = |_: &str| -> Result<String> { Ok("var a=0;".to_string()) };
        let compressor = compressor(
            HtmlCompressor::builder()
                .preserve_php(true)
                .compress_javascript(true)
                .javascript_minifier(Arc::new(replace_all)),
        );

        let html = "<script> var a = <?php echo 1; ?>; </script><script> var b = 1; </script>";
        assert_eq!(
            compressor.compress(html),
            "<script> var a = <?php echo 1; ?>; </script><script>var a=0;</script>"
        );
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let result = HtmlCompressor::builder().preserve_pattern("(unclosed").build();
        assert!(matches!(result, Err(MincerError::InvalidPattern { .. })));
    }

    #[test]
    fn test_empty_custom_tag_list() {
        let result = HtmlCompressor::builder()
            .remove_surrounding_spaces(SurroundingSpaces::Custom(Vec::new()))
            .build();
        assert!(matches!(result, Err(MincerError::InvalidTagList(_))));
    }

    #[test]
    fn test_statistics_only_when_enabled() {
        let plain = HtmlCompressor::new();
        plain.compress("<p>  a  </p>");
        assert!(plain.statistics().is_none());

        let tracked = compressor(HtmlCompressor::builder().generate_statistics(true));
        let output = tracked.compress("<p>  a  </p>");
        let stats = tracked.statistics().unwrap();
        assert_eq!(stats.original_metrics.filesize, 12);
        assert_eq!(stats.compressed_metrics.filesize, output.len());
    }

    #[test]
    fn test_debug_names_minifiers() {
        let debug = format!("{:?}", HtmlCompressor::new());
        assert!(debug.contains("JsMinifier"));
        assert!(debug.contains("CssMinifier"));
    }
}
