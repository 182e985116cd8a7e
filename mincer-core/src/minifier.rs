//! Pluggable script and style minifiers
//!
//! The pipeline never calls a concrete minifier by name. It holds two
//! [`Minifier`] strategies and reaches them through [`minify_block`], which
//! deals with CDATA wrappers and turns any failure into "keep the block".

use crate::patterns::CDATA_WRAPPER;
use crate::{MincerError, Result};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// A source-to-source minifier for one embedded language.
pub trait Minifier: Send + Sync {
    /// Minify `source`. An error leaves the original block in place.
    fn minify(&self, source: &str) -> Result<String>;

    /// Name used in log output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Minifier for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn minify(&self, source: &str) -> Result<String> {
        self(source)
    }
}

/// Run `block` through `minifier`.
///
/// A block fully wrapped in `<![CDATA[ ... ]]>` (surrounding whitespace
/// allowed) is unwrapped first and the result wrapped again. Errors and
/// panics inside the minifier return `block` unchanged.
pub fn minify_block(minifier: &dyn Minifier, block: &str) -> String {
    let cdata = CDATA_WRAPPER
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str());
    let source = cdata.unwrap_or(block);

    match panic::catch_unwind(AssertUnwindSafe(|| minifier.minify(source))) {
        Ok(Ok(minified)) => match cdata {
            Some(_) => format!("<![CDATA[{}]]>", minified),
            None => minified,
        },
        Ok(Err(e)) => {
            warn!(minifier = minifier.name(), error = %e, "minifier failed, keeping block");
            block.to_string()
        }
        Err(_) => {
            warn!(minifier = minifier.name(), "minifier panicked, keeping block");
            block.to_string()
        }
    }
}

// ========== JavaScript ==========

/// Default JavaScript minifier.
///
/// Removes comments and collapses whitespace outside string, template and
/// regular expression literals. A line break is kept wherever the source had
/// one so automatic semicolon insertion still sees it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinifier;

impl JsMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Minifier for JsMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let chars: Vec<char> = source.chars().collect();
        let mut out = String::with_capacity(source.len());
        let mut i = 0;

        while i < chars.len() {
            if starts_gap(&chars, i) {
                let (end, newline) = skip_gap(&chars, i)?;
                let next = chars.get(end).copied();
                match (out.chars().last(), next) {
                    (Some(_), Some(_)) if newline => out.push('\n'),
                    (Some(prev), Some(next)) if js_needs_space(prev, next) => out.push(' '),
                    _ => {}
                }
                i = end;
                continue;
            }

            let c = chars[i];
            i = match c {
                '"' | '\'' | '`' => copy_quoted(&chars, i, &mut out)?,
                '/' if regex_allowed(&out) => copy_regex(&chars, i, &mut out)?,
                _ => {
                    out.push(c);
                    i + 1
                }
            };
        }

        Ok(out)
    }
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn js_needs_space(prev: char, next: char) -> bool {
    (is_ident(prev) && is_ident(next))
        || (prev == '+' && next == '+')
        || (prev == '-' && next == '-')
        || (prev == '/' && next == '/')
}

fn regex_allowed(out: &str) -> bool {
    let trimmed = out.trim_end();
    let Some(last) = trimmed.chars().last() else {
        return true;
    };
    if "(,=:[!&|?{};+-*%<>~^".contains(last) {
        return true;
    }
    let word: String = trimmed
        .chars()
        .rev()
        .take_while(|c| is_ident(*c))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    matches!(
        word.as_str(),
        "return" | "typeof" | "case" | "do" | "else" | "in" | "of" | "void" | "delete" | "throw"
            | "new"
    )
}

fn copy_regex(chars: &[char], start: usize, out: &mut String) -> Result<usize> {
    out.push('/');
    let mut in_class = false;
    let mut j = start + 1;
    while j < chars.len() {
        let c = chars[j];
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.get(j + 1) {
                    out.push(*escaped);
                }
                j += 2;
                continue;
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Ok(j + 1),
            '\n' => break,
            _ => {}
        }
        j += 1;
    }
    Err(MincerError::Minifier("unterminated regular expression literal".to_string()))
}

// ========== CSS ==========

/// Default CSS minifier, backed by `lightningcss`.
///
/// Parses the stylesheet, applies its safe minifications (shorter colors,
/// folded `calc()`, merged rules) and prints it without whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl CssMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Minifier for CssMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
            .map_err(|e| MincerError::Minifier(format!("CSS parse error: {}", e)))?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| MincerError::Minifier(format!("CSS minify error: {}", e)))?;

        let printed = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| MincerError::Minifier(format!("CSS print error: {}", e)))?;

        Ok(printed.code)
    }
}

// ========== JavaScript scanning ==========

fn starts_gap(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    c.is_whitespace() || (c == '/' && matches!(chars.get(i + 1), Some('*' | '/')))
}

/// Skip whitespace and comments; returns the end index and whether the gap
/// spanned a line break.
fn skip_gap(chars: &[char], start: usize) -> Result<(usize, bool)> {
    let mut i = start;
    let mut newline = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            newline |= c == '\n';
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            let mut j = i + 2;
            loop {
                match (chars.get(j), chars.get(j + 1)) {
                    (Some('*'), Some('/')) => break,
                    (Some(inner), _) => {
                        newline |= *inner == '\n';
                        j += 1;
                    }
                    (None, _) => {
                        return Err(MincerError::Minifier("unterminated comment".to_string()));
                    }
                }
            }
            i = j + 2;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else {
            break;
        }
    }

    Ok((i, newline))
}

fn copy_quoted(chars: &[char], start: usize, out: &mut String) -> Result<usize> {
    let quote = chars[start];
    out.push(quote);
    let mut j = start + 1;
    while j < chars.len() {
        let c = chars[j];
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.get(j + 1) {
                out.push(*escaped);
            }
            j += 2;
            continue;
        }
        if c == quote {
            return Ok(j + 1);
        }
        if c == '\n' && quote != '`' {
            break;
        }
        j += 1;
    }
    Err(MincerError::Minifier(format!("unterminated {} literal", quote)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_strips_comments_and_spaces() {
        let js = "  var a = 1; // one\n/* two */ var b = a + 2;  ";
        let out = JsMinifier.minify(js).unwrap();
        assert_eq!(out, "var a=1;\nvar b=a+2;");
    }

    #[test]
    fn test_js_keeps_literals() {
        let js = r#"var s = "a  // b"; var r = /\/\/ x/g; var t = `x   y`;"#;
        let out = JsMinifier.minify(js).unwrap();
        assert_eq!(out, r#"var s="a  // b";var r=/\/\/ x/g;var t=`x   y`;"#);
    }

    #[test]
    fn test_js_keeps_increment_separation() {
        assert_eq!(JsMinifier.minify("a + +b").unwrap(), "a+ +b");
        assert_eq!(JsMinifier.minify("a - -b").unwrap(), "a- -b");
    }

    #[test]
    fn test_js_is_idempotent() {
        let js = "function f ( x ) {\n  return x  * 2 ; // double\n}\n";
        let once = JsMinifier.minify(js).unwrap();
        assert_eq!(JsMinifier.minify(&once).unwrap(), once);
    }

    #[test]
    fn test_js_unterminated_string_fails() {
        assert!(JsMinifier.minify("var a = 'oops").is_err());
    }

    #[test]
    fn test_css_minify() {
        let css = "body {\n  color: red ;\n  margin: 0 auto; }\n/* c */ a > b , i { display: block }";
        let out = CssMinifier.minify(css).unwrap();
        assert_eq!(out, "body{color:red;margin:0 auto}a>b,i{display:block}");
    }

    #[test]
    fn test_css_drops_space_around_colon() {
        assert_eq!(CssMinifier.minify("p { color : red }").unwrap(), "p{color:red}");
        assert_eq!(
            CssMinifier.minify("a:hover { color : #ff0000 ; }").unwrap(),
            "a:hover{color:red}"
        );
    }

    #[test]
    fn test_minify_block_cdata() {
        let block = "\n<![CDATA[\n  var a  =  1;\n]]>\n";
        assert_eq!(minify_block(&JsMinifier, block), "<![CDATA[var a=1;]]>");
    }

    #[test]
    fn test_minify_block_error_keeps_original() {
        let failing = |_: &str| -> Result<String> { Err(MincerError::Minifier("boom".into())) };
        assert_eq!(minify_block(&failing, " a  b "), " a  b ");
    }

    #[test]
    fn test_minify_block_panic_keeps_original() {
        let panicking = |_: &str| -> Result<String> { panic!("minifier bug") };
        assert_eq!(minify_block(&panicking, "x = 1"), "x = 1");
    }

    #[test]
    fn test_closure_minifier() {
        let upper = |s: &str| -> Result<String> { Ok(s.to_uppercase()) };
        assert_eq!(minify_block(&upper, "abc"), "ABC");
    }
}
