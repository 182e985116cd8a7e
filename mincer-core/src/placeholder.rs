//! Placeholder substitution engine
//!
//! Protected spans are cut out of the working document and replaced by
//! tokens of the form `%%%~<marker>~<category>~<index>~%%%`. Each category
//! keeps its own ordered block list; the index inside the token is the only
//! key that ties a token back to its block.
//!
//! The marker is chosen per run so that it never occurs in the run's input
//! (see [`Scope::for_source`]). Once extraction is done every remaining `%`
//! of the input is itself swapped for a token ([`BlockStore::escape_percent`]),
//! so no rewrite of the surrounding text can splice input characters into
//! something that reads as a token of the run.

use crate::patterns::{PERCENT_RUN, TOKEN};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

const MARKER_BASE: &str = "COMPRESS";

/// Kind of protected block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Caller supplied pattern, keyed by its position in the pattern list
    User(usize),
    /// `<!-- {{{ -->...<!-- }}} -->` regions
    Skip,
    /// Vendor conditional comments, stored already minified
    ConditionalComment,
    /// Inline `on*` event handler values
    Event,
    /// `<pre>` contents
    Pre,
    /// `<script>` contents
    Script,
    /// `<script>` contents of a non-JavaScript type, kept verbatim
    RawScript,
    /// `<style>` contents
    Style,
    /// `<textarea>` contents
    TextArea,
    /// Preserved line breaks
    LineBreak,
    /// XML `<![CDATA[...]]>` sections
    Cdata,
    /// Runs of `%` left in the document after extraction
    Percent,
}

impl Category {
    /// Tag name used inside tokens, without the user position.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::User(_) => "USER",
            Self::Skip => "SKIP",
            Self::ConditionalComment => "COND",
            Self::Event => "EVENT",
            Self::Pre => "PRE",
            Self::Script => "SCRIPT",
            Self::RawScript => "RAWSCRIPT",
            Self::Style => "STYLE",
            Self::TextArea => "TEXTAREA",
            Self::LineBreak => "LT",
            Self::Cdata => "CDATA",
            Self::Percent => "PCT",
        }
    }

    fn from_token(tag: &str, position: &str) -> Option<Self> {
        let category = match tag {
            "USER" => Self::User(position.parse().ok()?),
            "SKIP" => Self::Skip,
            "COND" => Self::ConditionalComment,
            "EVENT" => Self::Event,
            "PRE" => Self::Pre,
            "SCRIPT" => Self::Script,
            "RAWSCRIPT" => Self::RawScript,
            "STYLE" => Self::Style,
            "TEXTAREA" => Self::TextArea,
            "LT" => Self::LineBreak,
            "CDATA" => Self::Cdata,
            "PCT" => Self::Percent,
            _ => return None,
        };
        // Only user tokens carry a position
        match (category, position.is_empty()) {
            (Self::User(_), false) | (_, true) => Some(category),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(position) => write!(f, "USER{}", position),
            other => f.write_str(other.tag()),
        }
    }
}

/// Token marker for one compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    marker: String,
}

impl Scope {
    /// Pick the first marker (`COMPRESS`, `COMPRESS1`, ...) whose token
    /// prefix does not already occur in `source`.
    pub fn for_source(source: &str) -> Self {
        let mut attempt = 0usize;
        loop {
            let marker = if attempt == 0 {
                MARKER_BASE.to_string()
            } else {
                format!("{}{}", MARKER_BASE, attempt)
            };
            if !source.contains(&format!("%%%~{}~", marker)) {
                return Self { marker };
            }
            attempt += 1;
        }
    }

    /// Marker embedded in this run's tokens.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Render the token for `index` within `category`.
    pub fn token(&self, category: Category, index: usize) -> String {
        format!("%%%~{}~{}~{}~%%%", self.marker, category, index)
    }

    /// Whether `before` and `after` carry the same tokens of this scope, in
    /// the same order.
    pub fn same_placeholders(&self, before: &str, after: &str) -> bool {
        self.tokens(before).eq(self.tokens(after))
    }

    fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        Segments::new(text, self).filter_map(|segment| match segment {
            Segment::Placeholder { raw, .. } => Some(raw),
            Segment::Literal(_) => None,
        })
    }
}

/// One piece of a placeholder-bearing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary text, including tokens that belong to another scope
    Literal(&'a str),
    /// A token of the scanning scope
    Placeholder {
        category: Category,
        index: usize,
        raw: &'a str,
    },
}

/// Lazy left-to-right split of `text` into literal spans and tokens.
pub struct Segments<'a> {
    text: &'a str,
    scope: &'a Scope,
    matches: regex::CaptureMatches<'static, 'a>,
    cursor: usize,
    pending: Option<Segment<'a>>,
}

impl<'a> Segments<'a> {
    pub fn new(text: &'a str, scope: &'a Scope) -> Self {
        Self {
            text,
            scope,
            matches: TOKEN.captures_iter(text),
            cursor: 0,
            pending: None,
        }
    }
}

fn placeholder<'a>(scope: &Scope, caps: &Captures<'a>) -> Option<Segment<'a>> {
    if &caps[1] != scope.marker() {
        return None;
    }
    let category = Category::from_token(&caps[2], &caps[3])?;
    let index = caps[4].parse().ok()?;
    let raw = caps.get(0)?.as_str();
    Some(Segment::Placeholder {
        category,
        index,
        raw,
    })
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }

        for caps in self.matches.by_ref() {
            let Some(whole) = caps.get(0) else { continue };
            let Some(segment) = placeholder(self.scope, &caps) else {
                continue;
            };
            let literal = &self.text[self.cursor..whole.start()];
            self.cursor = whole.end();
            if literal.is_empty() {
                return Some(segment);
            }
            self.pending = Some(segment);
            return Some(Segment::Literal(literal));
        }

        if self.cursor < self.text.len() {
            let literal = &self.text[self.cursor..];
            self.cursor = self.text.len();
            return Some(Segment::Literal(literal));
        }
        None
    }
}

/// What an extraction pass does with one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the match in the document as ordinary markup
    Keep,
    /// Store `content` and replace the whole match with a token
    Whole { category: Category, content: String },
    /// Store capture `group` and replace only that group with a token,
    /// keeping the surrounding tag text in place
    Group { category: Category, group: usize },
}

/// Per-run store of every extracted block, keyed by category.
#[derive(Debug, Clone)]
pub struct BlockStore {
    scope: Scope,
    blocks: BTreeMap<Category, Vec<String>>,
}

impl BlockStore {
    /// Create a store whose scope is chosen against `source`.
    pub fn for_source(source: &str) -> Self {
        Self {
            scope: Scope::for_source(source),
            blocks: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Blocks of one category, in extraction order.
    pub fn blocks(&self, category: Category) -> &[String] {
        self.blocks.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total byte length of one category's blocks.
    pub fn size(&self, category: Category) -> usize {
        self.blocks(category).iter().map(String::len).sum()
    }

    /// Append a block and return the token that stands for it.
    pub fn push(&mut self, category: Category, content: String) -> String {
        let list = self.blocks.entry(category).or_default();
        let index = list.len();
        list.push(content);
        self.scope.token(category, index)
    }

    /// Extract every non-blank capture `group` of `pattern` into `category`,
    /// keeping the rest of the match in place.
    pub fn extract_group(
        &mut self,
        document: &str,
        pattern: &Regex,
        category: Category,
        group: usize,
    ) -> String {
        self.extract(document, pattern, |_| Decision::Group { category, group })
    }

    /// Scan `document` left to right and apply `decide` to every match.
    ///
    /// Blank content is never stored (line breaks excepted), so empty
    /// `<pre>` or `<script>` elements stay as ordinary markup.
    pub fn extract<F>(&mut self, document: &str, pattern: &Regex, mut decide: F) -> String
    where
        F: FnMut(&Captures<'_>) -> Decision,
    {
        let mut output = String::with_capacity(document.len());
        let mut last = 0;

        for caps in pattern.captures_iter(document) {
            let Some(whole) = caps.get(0) else { continue };

            match decide(&caps) {
                Decision::Keep => continue,
                Decision::Whole { category, content } => {
                    if is_blank(category, &content) {
                        continue;
                    }
                    output.push_str(&document[last..whole.start()]);
                    output.push_str(&self.push(category, content));
                }
                Decision::Group { category, group } => {
                    let Some(inner) = caps.get(group) else { continue };
                    if is_blank(category, inner.as_str()) {
                        continue;
                    }
                    output.push_str(&document[last..inner.start()]);
                    output.push_str(&self.push(category, inner.as_str().to_string()));
                    output.push_str(&document[inner.end()..whole.end()]);
                }
            }
            last = whole.end();
        }

        if last == 0 && output.is_empty() {
            return document.to_string();
        }
        output.push_str(&document[last..]);
        output
    }

    /// Swap every run of `%` outside this scope's tokens for a token.
    ///
    /// Run last, after every other extraction, so that the only `%` left in
    /// the document belong to tokens of this scope.
    pub fn escape_percent(&mut self, document: &str) -> String {
        let scope = self.scope.clone();
        let mut output = String::with_capacity(document.len());

        for segment in Segments::new(document, &scope) {
            match segment {
                Segment::Literal(text) => {
                    let mut last = 0;
                    for run in PERCENT_RUN.find_iter(text) {
                        output.push_str(&text[last..run.start()]);
                        output.push_str(&self.push(Category::Percent, run.as_str().to_string()));
                        last = run.end();
                    }
                    output.push_str(&text[last..]);
                }
                Segment::Placeholder { raw, .. } => output.push_str(raw),
            }
        }
        output
    }

    /// Rewrite every block of `category` with `rewrite`.
    ///
    /// A rewrite that adds, drops or reorders tokens of this scope is
    /// discarded and the block is kept as it was.
    pub fn transform<F>(&mut self, category: Category, mut rewrite: F)
    where
        F: FnMut(&str) -> String,
    {
        let Some(list) = self.blocks.get_mut(&category) else {
            return;
        };
        for (index, block) in list.iter_mut().enumerate() {
            let rewritten = rewrite(block.as_str());
            if self.scope.same_placeholders(block.as_str(), &rewritten) {
                *block = rewritten;
            } else {
                warn!(category = %category, index, "rewrite changed placeholders, block kept");
            }
        }
    }

    /// Put every block back into `document` in a single left-to-right pass.
    ///
    /// Tokens inside a restored block are resolved the same way. A block only
    /// ever holds tokens of blocks stored before it, so this gives the result
    /// of restoring category by category in reverse extraction order, without
    /// rescanning text that has already been put back. Block text is copied
    /// literally and a token whose index has no block is left as is.
    pub fn restore(&self, document: &str) -> String {
        let mut output = String::with_capacity(document.len());
        let restored = self.restore_into(document, &mut output);
        if restored > 0 {
            debug!(restored, "restored preserved blocks");
        }
        output
    }

    fn restore_into(&self, text: &str, output: &mut String) -> usize {
        let mut restored = 0;
        for segment in Segments::new(text, &self.scope) {
            match segment {
                Segment::Literal(literal) => output.push_str(literal),
                Segment::Placeholder {
                    category,
                    index,
                    raw,
                } => match self.blocks(category).get(index) {
                    Some(block) => restored += 1 + self.restore_into(block, output),
                    None => {
                        warn!(category = %category, index, "placeholder without a stored block");
                        output.push_str(raw);
                    }
                },
            }
        }
        restored
    }

    /// Categories that hold at least one block, in key order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.blocks
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(category, _)| *category)
    }
}

fn is_blank(category: Category, content: &str) -> bool {
    category != Category::LineBreak && content.trim().is_empty()
}
