//! Precompiled pattern library
//!
//! Every matcher the pipeline uses lives here as a process-wide
//! [`Lazy<Regex>`]. The `regex` engine has no backreferences or lookaround, so
//! quoted attribute values are spelled out as `"v"|'v'|v` alternations and
//! "inside a tag" conditions are applied by rewriting each [`TAG`] match
//! rather than with lookahead.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimal block tag set for surrounding-space removal
pub const BLOCK_TAGS_MIN: &str = "html,head,body,br,p";

/// Maximal block tag set for surrounding-space removal
pub const BLOCK_TAGS_MAX: &str = "html,head,body,br,p,h1,h2,h3,h4,h5,h6,blockquote,center,dl,fieldset,form,frame,frameset,hr,noframes,ol,table,tbody,tr,td,th,tfoot,thead,ul";

/// Preset name selecting every tag for surrounding-space removal
pub const ALL_TAGS: &str = "all";

// ========== Predefined preservation patterns ==========

/// PHP-style processing blocks: `<?php ... ?>`, `<?= ... ?>`
pub static PHP_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<\?.*?\?>").unwrap());

/// Server script blocks: `<% ... %>`
pub static SERVER_SCRIPT_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<%.*?%>").unwrap());

/// Server side includes: `<!--#include virtual="..." -->`
pub static SERVER_SIDE_INCLUDE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--\s*#.*?-->").unwrap());

// ========== Protected regions ==========

pub(crate) static SKIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--\s*\{\{\{\s*-->(.*?)<!--\s*\}\}\}\s*-->").unwrap()
});

pub(crate) static CONDITIONAL_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(<!(?:--)?\[[^\]]+?\]>)(.*?)(<!(?:--)?\[endif\](?:--)?>)").unwrap()
});

pub(crate) static EVENT_DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\son[a-z]+\s*=\s*")([^"\\\r\n]*(?:\\.[^"\\\r\n]*)*)(")"#).unwrap()
});

pub(crate) static EVENT_SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\son[a-z]+\s*=\s*')([^'\\\r\n]*(?:\\.[^'\\\r\n]*)*)(')"#).unwrap()
});

pub(crate) static PRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<pre(?:\s[^>]*)?>)(.*?)(</pre>)").unwrap());

pub(crate) static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<script(?:\s[^>]*)?>)(.*?)(</script>)").unwrap());

pub(crate) static STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<style(?:\s[^>]*)?>)(.*?)(</style>)").unwrap());

pub(crate) static TEXTAREA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(<textarea(?:\s[^>]*)?>)(.*?)(</textarea>)").unwrap());

pub(crate) static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[ \t]*(\r?\n)[ \t]*)+").unwrap());

pub(crate) static TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\stype\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

pub(crate) static CDATA_WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*<!\[CDATA\[(.*?)\]\]>\s*$").unwrap());

pub(crate) static EVENT_JS_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^javascript:\s*(.+)$").unwrap());

// ========== Placeholder tokens ==========

/// `%%%~<marker>~<category><position>~<index>~%%%`
pub(crate) static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%%%~(COMPRESS\d*)~([A-Z]+)(\d*)~(\d+)~%%%").unwrap()
});

pub(crate) static PERCENT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("%+").unwrap());

// ========== Residual transformations ==========

pub(crate) static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!---->|<!--[^\[].*?-->").unwrap());

pub(crate) static DOCTYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!DOCTYPE[^>]*>").unwrap());

pub(crate) static JS_TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)(<script\b[^>]*?)\s+type\s*=\s*(?:"(?:text|application)/javascript"|'(?:text|application)/javascript'|(?:text|application)/javascript)((?:\s[^>]*)?/?>)"#,
    )
    .unwrap()
});

pub(crate) static JS_LANG_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<script\b[^>]*?)\s+language\s*=\s*(?:"javascript"|'javascript'|javascript)((?:\s[^>]*)?/?>)"#)
        .unwrap()
});

pub(crate) static STYLE_TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<style\b[^>]*?)\s+type\s*=\s*(?:"text/css"|'text/css'|text/css)((?:\s[^>]*)?/?>)"#)
        .unwrap()
});

pub(crate) static LINK_TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)(<link\b[^>]*?)\s+type\s*=\s*(?:"text/(?:css|plain)"|'text/(?:css|plain)'|text/(?:css|plain))((?:\s[^>]*)?/?>)"#,
    )
    .unwrap()
});

pub(crate) static LINK_REL_STYLESHEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^<link[^>]*\srel\s*=\s*(?:"(?:alternate\s+)?stylesheet"|'(?:alternate\s+)?stylesheet'|(?:alternate\s+)?stylesheet)[^>]*>$"#,
    )
    .unwrap()
});

pub(crate) static FORM_METHOD_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<form\b[^>]*?)\s+method\s*=\s*(?:"get"|'get'|get)((?:\s[^>]*)?/?>)"#).unwrap()
});

pub(crate) static INPUT_TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(<input\b[^>]*?)\s+type\s*=\s*(?:"text"|'text'|text)((?:\s[^>]*)?/?>)"#).unwrap()
});

/// Any start, end or declaration tag
pub(crate) static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]+>").unwrap());

/// Quoted runs inside a tag, left alone by spacing rules
pub(crate) static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).unwrap());

pub(crate) static BOOLEAN_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s)(checked|selected|disabled|readonly)\s*=\s*(?:"\w*"|'\w*'|\w+)"#).unwrap()
});

pub(crate) static HTTP_PROTOCOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s(?:href|src|cite|action)\s*=\s*["'])http:(//)"#).unwrap()
});

pub(crate) static HTTPS_PROTOCOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\s(?:href|src|cite|action)\s*=\s*["'])https:(//)"#).unwrap()
});

pub(crate) static REL_EXTERNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)\srel\s*=\s*(?:"(?:alternate\s+)?external"|'(?:alternate\s+)?external'|(?:alternate\s+)?external(?:\s|/|>))"#,
    )
    .unwrap()
});

/// Whitespace between a tag or token end and a tag or token start
pub(crate) static INTERTAG_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(>|~%%%)\s+(<|%%%~)").unwrap());

pub(crate) static MULTISPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub(crate) static TAG_PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s[\w:.-]+)\s*=\s*").unwrap());

pub(crate) static UNQUOTED_LAST_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)=\s*[a-z0-9_-]+$").unwrap());

/// Attribute value that is safe without quotes
pub(crate) static SIMPLE_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9_-]+$").unwrap());

pub(crate) static SURROUNDING_SPACES_MIN: Lazy<Regex> =
    Lazy::new(|| surrounding_spaces_regex(BLOCK_TAGS_MIN).unwrap());

pub(crate) static SURROUNDING_SPACES_MAX: Lazy<Regex> =
    Lazy::new(|| surrounding_spaces_regex(BLOCK_TAGS_MAX).unwrap());

pub(crate) static SURROUNDING_SPACES_ALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\s*(<[^>]+>)\s*").unwrap());

// ========== XML ==========

pub(crate) static XML_CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!\[CDATA\[.*?\]\]>").unwrap());

pub(crate) static XML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Build the surrounding-space matcher for a comma separated tag list.
///
/// Tag names are escaped, so only the list shape can make this fail.
pub(crate) fn surrounding_spaces_regex(tags: &str) -> Result<Regex, regex::Error> {
    let alternation = tags
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"(?is)\s*(</?(?:{alternation})(?:>|[\s/][^>]*>))\s*"))
}
