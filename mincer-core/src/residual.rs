//! Residual transformation pipeline
//!
//! Runs over the document after every protected span has been swapped for
//! a placeholder token. Each pass is gated by one configuration switch and
//! is idempotent on its own output; later passes assume the earlier ones
//! already ran.

use crate::config::HtmlCompressorConfig;
use crate::patterns::*;
use regex::{Captures, Regex};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Ordered residual passes for one compressor configuration.
pub struct ResidualPipeline<'c> {
    config: &'c HtmlCompressorConfig,
    surrounding: Option<&'c Regex>,
}

impl<'c> ResidualPipeline<'c> {
    /// `surrounding` is the compiled matcher for
    /// [`HtmlCompressorConfig::remove_surrounding_spaces`].
    pub fn new(config: &'c HtmlCompressorConfig, surrounding: Option<&'c Regex>) -> Self {
        Self {
            config,
            surrounding,
        }
    }

    /// Apply every enabled pass in order and trim the result.
    pub fn run(&self, html: &str) -> String {
        let mut result = html.to_string();

        result = self.remove_comments(result);
        result = self.simple_doctype(result);
        result = self.remove_script_attributes(result);
        result = self.remove_style_attributes(result);
        result = self.remove_link_attributes(result);
        result = self.remove_form_attributes(result);
        result = self.remove_input_attributes(result);
        result = self.simple_boolean_attributes(result);
        result = self.remove_http_protocol(result);
        result = self.remove_https_protocol(result);
        result = self.remove_intertag_spaces(result);
        result = self.remove_multi_spaces(result);
        result = self.remove_spaces_inside_tags(result);
        result = self.remove_quotes_inside_tags(result);
        result = self.remove_surrounding_spaces(result);

        debug!(before = html.len(), after = result.len(), "residual passes done");
        result.trim().to_string()
    }

    fn remove_comments(&self, html: String) -> String {
        if !self.config.remove_comments {
            return html;
        }
        trace!("removing comments");
        COMMENT.replace_all(&html, "").into_owned()
    }

    fn simple_doctype(&self, html: String) -> String {
        if !self.config.simple_doctype {
            return html;
        }
        DOCTYPE.replace_all(&html, "<!DOCTYPE html>").into_owned()
    }

    fn remove_script_attributes(&self, html: String) -> String {
        if !self.config.remove_script_attributes {
            return html;
        }
        let html = JS_TYPE_ATTR.replace_all(&html, "${1}${2}");
        JS_LANG_ATTR.replace_all(&html, "${1}${2}").into_owned()
    }

    fn remove_style_attributes(&self, html: String) -> String {
        if !self.config.remove_style_attributes {
            return html;
        }
        STYLE_TYPE_ATTR.replace_all(&html, "${1}${2}").into_owned()
    }

    fn remove_link_attributes(&self, html: String) -> String {
        if !self.config.remove_link_attributes {
            return html;
        }
        // Only stylesheet links have a default type
        LINK_TYPE_ATTR
            .replace_all(&html, |caps: &Captures<'_>| {
                if LINK_REL_STYLESHEET.is_match(&caps[0]) {
                    format!("{}{}", &caps[1], &caps[2])
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    fn remove_form_attributes(&self, html: String) -> String {
        if !self.config.remove_form_attributes {
            return html;
        }
        FORM_METHOD_ATTR.replace_all(&html, "${1}${2}").into_owned()
    }

    fn remove_input_attributes(&self, html: String) -> String {
        if !self.config.remove_input_attributes {
            return html;
        }
        INPUT_TYPE_ATTR.replace_all(&html, "${1}${2}").into_owned()
    }

    fn simple_boolean_attributes(&self, html: String) -> String {
        if !self.config.simple_boolean_attributes {
            return html;
        }
        rewrite_tags(&html, |tag| {
            if !is_element_tag(tag) {
                return Cow::Borrowed(tag);
            }
            BOOLEAN_ATTR.replace_all(tag, "${1}${2}")
        })
    }

    fn remove_http_protocol(&self, html: String) -> String {
        if !self.config.remove_http_protocol {
            return html;
        }
        strip_protocol(&html, &HTTP_PROTOCOL)
    }

    fn remove_https_protocol(&self, html: String) -> String {
        if !self.config.remove_https_protocol {
            return html;
        }
        strip_protocol(&html, &HTTPS_PROTOCOL)
    }

    fn remove_intertag_spaces(&self, html: String) -> String {
        if !self.config.remove_intertag_spaces {
            return html;
        }
        remove_intertag_spaces(&html).into_owned()
    }

    fn remove_multi_spaces(&self, html: String) -> String {
        if !self.config.remove_multi_spaces {
            return html;
        }
        MULTISPACE.replace_all(&html, " ").into_owned()
    }

    fn remove_spaces_inside_tags(&self, html: String) -> String {
        rewrite_tags(&html, |tag| {
            let tag = rewrite_unquoted(tag, |run| TAG_PROPERTY.replace_all(run, "${1}="));
            Cow::Owned(trim_tag_end(&tag).into_owned())
        })
    }

    fn remove_quotes_inside_tags(&self, html: String) -> String {
        if !self.config.remove_quotes {
            return html;
        }
        rewrite_tags(&html, unquote_values)
    }

    fn remove_surrounding_spaces(&self, html: String) -> String {
        match self.surrounding {
            Some(pattern) => pattern.replace_all(&html, "${1}").into_owned(),
            None => html,
        }
    }
}

/// Drop whitespace between tags and tokens.
///
/// Protected spans are tokens at this point, so a tag/token or token/token
/// boundary counts as a gap too. A `%` token is ordinary text and keeps the
/// whitespace next to it.
pub(crate) fn remove_intertag_spaces(html: &str) -> Cow<'_, str> {
    INTERTAG_GAP.replace_all(html, |caps: &Captures<'_>| {
        let (Some(left), Some(right)) = (caps.get(1), caps.get(2)) else {
            return caps[0].to_string();
        };
        let after_percent =
            left.as_str() != ">" && ends_percent_token(&html[..left.start()]);
        let before_percent =
            right.as_str() != "<" && starts_percent_token(&html[right.end()..]);

        if after_percent || before_percent {
            caps[0].to_string()
        } else {
            format!("{}{}", left.as_str(), right.as_str())
        }
    })
}

/// `head` ends right before the closing `~%%%` of a `%` token.
fn ends_percent_token(head: &str) -> bool {
    head.trim_end_matches(|c: char| c.is_ascii_digit())
        .ends_with("~PCT~")
}

/// `tail` starts right after the opening `%%%~` of a `%` token.
fn starts_percent_token(tail: &str) -> bool {
    tail.strip_prefix("COMPRESS")
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
        .is_some_and(|rest| rest.starts_with("~PCT~"))
}

/// Drop the quotes around attribute values made only of letters, digits,
/// `-` and `_`. Quote characters inside another quoted value are left alone.
fn unquote_values(tag: &str) -> Cow<'_, str> {
    let mut output = String::with_capacity(tag.len());
    let mut changed = false;
    let mut last = 0;

    for quoted in QUOTED.find_iter(tag) {
        let before = &tag[last..quoted.start()];
        let value = &quoted.as_str()[1..quoted.len() - 1];

        match before.trim_end().strip_suffix('=') {
            Some(name) if SIMPLE_VALUE.is_match(value) => {
                output.push_str(name.trim_end());
                output.push('=');
                output.push_str(value);
                // Keep `/` of a self-closing tag apart from the bare value
                if tag[quoted.end()..].starts_with('/') {
                    output.push(' ');
                }
                changed = true;
            }
            _ => {
                output.push_str(before);
                output.push_str(quoted.as_str());
            }
        }
        last = quoted.end();
    }

    if !changed {
        return Cow::Borrowed(tag);
    }
    output.push_str(&tag[last..]);
    Cow::Owned(output)
}

/// Apply `rewrite` to every tag in `html`, leaving text between tags alone.
pub(crate) fn rewrite_tags<F>(html: &str, rewrite: F) -> String
where
    F: for<'t> Fn(&'t str) -> Cow<'t, str>,
{
    TAG.replace_all(html, |caps: &Captures<'_>| rewrite(&caps[0]).into_owned())
        .into_owned()
}

/// Apply `rewrite` to the parts of `tag` outside quoted attribute values.
pub(crate) fn rewrite_unquoted<'t, F>(tag: &'t str, rewrite: F) -> Cow<'t, str>
where
    F: for<'r> Fn(&'r str) -> Cow<'r, str>,
{
    let mut output = String::with_capacity(tag.len());
    let mut changed = false;
    let mut last = 0;

    for quoted in QUOTED.find_iter(tag) {
        let run = &tag[last..quoted.start()];
        let rewritten = rewrite(run);
        changed |= rewritten != run;
        output.push_str(&rewritten);
        output.push_str(quoted.as_str());
        last = quoted.end();
    }

    let run = &tag[last..];
    let rewritten = rewrite(run);
    changed |= rewritten != run;
    output.push_str(&rewritten);

    if changed {
        Cow::Owned(output)
    } else {
        Cow::Borrowed(tag)
    }
}

/// Drop whitespace before `>` or `/>`. A space stays in front of `/>` when
/// the last attribute value is unquoted, so the slash is not read as part
/// of the value.
pub(crate) fn trim_tag_end(tag: &str) -> Cow<'_, str> {
    let (body, close) = match tag.strip_suffix("/>") {
        Some(body) => (body, "/>"),
        None => (tag.strip_suffix('>').unwrap_or(tag), ">"),
    };
    let trimmed = body.trim_end();

    if trimmed.len() == body.len() || trimmed.len() <= 1 {
        return Cow::Borrowed(tag);
    }
    if close == "/>" && UNQUOTED_LAST_VALUE.is_match(trimmed) {
        return Cow::Owned(format!("{} />", trimmed));
    }
    Cow::Owned(format!("{}{}", trimmed, close))
}

fn is_element_tag(tag: &str) -> bool {
    tag.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic)
}

fn strip_protocol(html: &str, protocol: &Regex) -> String {
    rewrite_tags(html, |tag| {
        if REL_EXTERNAL.is_match(tag) {
            return Cow::Borrowed(tag);
        }
        protocol.replace_all(tag, "${1}${2}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurroundingSpaces;

    fn only(configure: impl FnOnce(&mut HtmlCompressorConfig)) -> HtmlCompressorConfig {
        let mut config = HtmlCompressorConfig {
            remove_comments: false,
            remove_multi_spaces: false,
            ..HtmlCompressorConfig::default()
        };
        configure(&mut config);
        config
    }

    fn run(config: &HtmlCompressorConfig, html: &str) -> String {
        ResidualPipeline::new(config, None).run(html)
    }

    #[test]
    fn test_remove_comments() {
        let config = only(|c| c.remove_comments = true);
        assert_eq!(run(&config, "<div><!-- c --></div>"), "<div></div>");
        assert_eq!(run(&config, "<div><!----></div>"), "<div></div>");
    }

    #[test]
    fn test_simple_doctype() {
        let config = only(|c| c.simple_doctype = true);
        let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "x.dtd"><html>"#;
        assert_eq!(run(&config, html), "<!DOCTYPE html><html>");
    }

    #[test]
    fn test_remove_script_attributes() {
        let config = only(|c| c.remove_script_attributes = true);
        assert_eq!(
            run(&config, r#"<script type="text/javascript" language="javascript" src="a.js"></script>"#),
            r#"<script src="a.js"></script>"#
        );
        assert_eq!(
            run(&config, r#"<script data-type="text/javascript"></script>"#),
            r#"<script data-type="text/javascript"></script>"#
        );
    }

    #[test]
    fn test_remove_style_and_form_and_input_attributes() {
        let config = only(|c| {
            c.remove_style_attributes = true;
            c.remove_form_attributes = true;
            c.remove_input_attributes = true;
        });
        assert_eq!(run(&config, r#"<style type="text/css">"#), "<style>");
        assert_eq!(run(&config, r#"<form method='get' action="/s">"#), r#"<form action="/s">"#);
        assert_eq!(run(&config, r#"<input type="text" name="q">"#), r#"<input name="q">"#);
        assert_eq!(
            run(&config, r#"<input type="checkbox">"#),
            r#"<input type="checkbox">"#
        );
    }

    #[test]
    fn test_remove_link_attributes_only_for_stylesheets() {
        let config = only(|c| c.remove_link_attributes = true);
        assert_eq!(
            run(&config, r#"<link rel="stylesheet" type="text/css" href="a.css">"#),
            r#"<link rel="stylesheet" href="a.css">"#
        );
        assert_eq!(
            run(&config, r#"<link rel="alternate stylesheet" type="text/css" href="b.css">"#),
            r#"<link rel="alternate stylesheet" href="b.css">"#
        );
        let icon = r#"<link rel="icon" type="text/css" href="c">"#;
        assert_eq!(run(&config, icon), icon);
    }

    #[test]
    fn test_simple_boolean_attributes() {
        let config = only(|c| c.simple_boolean_attributes = true);
        assert_eq!(
            run(&config, r#"<input checked="checked" disabled='disabled' readonly=readonly>"#),
            "<input checked disabled readonly>"
        );
        assert_eq!(
            run(&config, r#"<option data-selected="x">"#),
            r#"<option data-selected="x">"#
        );
    }

    #[test]
    fn test_remove_http_protocol() {
        let config = only(|c| c.remove_http_protocol = true);
        assert_eq!(run(&config, r#"<a href="http://x.com">"#), r#"<a href="//x.com">"#);
        assert_eq!(
            run(&config, r#"<a href="http://x.com" rel="external">"#),
            r#"<a href="http://x.com" rel="external">"#
        );
        assert_eq!(
            run(&config, r#"<a rel="alternate external" href="http://x.com">"#),
            r#"<a rel="alternate external" href="http://x.com">"#
        );
        assert_eq!(
            run(&config, r#"<a href="https://x.com">"#),
            r#"<a href="https://x.com">"#
        );
    }

    #[test]
    fn test_remove_https_protocol() {
        let config = only(|c| c.remove_https_protocol = true);
        assert_eq!(
            run(&config, r#"<img src='https://x.com/a.png'>"#),
            "<img src='//x.com/a.png'>"
        );
    }

    #[test]
    fn test_remove_intertag_spaces_around_tokens() {
        let config = only(|c| c.remove_intertag_spaces = true);
        let html = "<div> \n <p> %%%~COMPRESS~PRE~0~%%%  \n  %%%~COMPRESS~PRE~1~%%% </p>";
        assert_eq!(
            run(&config, html),
            "<div><p>%%%~COMPRESS~PRE~0~%%%%%%~COMPRESS~PRE~1~%%%</p>"
        );
    }

    #[test]
    fn test_intertag_spaces_kept_next_to_percent() {
        let html = "<b>a</b> %%%~COMPRESS~PCT~0~%%% <i>b</i>  %%%~COMPRESS~PRE~0~%%%";
        assert_eq!(
            remove_intertag_spaces(html),
            "<b>a</b> %%%~COMPRESS~PCT~0~%%% <i>b</i>%%%~COMPRESS~PRE~0~%%%"
        );
        assert_eq!(
            remove_intertag_spaces("%%%~COMPRESS2~PCT~11~%%% %%%~COMPRESS2~PRE~0~%%%"),
            "%%%~COMPRESS2~PCT~11~%%% %%%~COMPRESS2~PRE~0~%%%"
        );
    }

    #[test]
    fn test_multi_spaces() {
        let config = only(|c| c.remove_multi_spaces = true);
        assert_eq!(run(&config, "<p>a  \n\t b</p>"), "<p>a b</p>");
    }

    #[test]
    fn test_spaces_inside_tags() {
        let config = only(|_| {});
        assert_eq!(run(&config, r#"<div class = "a b" >"#), r#"<div class="a b">"#);
        assert_eq!(run(&config, r#"<br class="a" />"#), r#"<br class="a"/>"#);
        assert_eq!(run(&config, "<br class=a />"), "<br class=a />");
        assert_eq!(run(&config, r#"<p title="x = y">"#), r#"<p title="x = y">"#);
    }

    #[test]
    fn test_remove_quotes() {
        let config = only(|c| c.remove_quotes = true);
        assert_eq!(run(&config, r#"<div class="foo">"#), "<div class=foo>");
        assert_eq!(run(&config, r#"<div class="foo bar">"#), r#"<div class="foo bar">"#);
        assert_eq!(run(&config, r#"<br class="foo"/>"#), "<br class=foo />");
        assert_eq!(
            run(&config, r#"<a onclick="%%%~COMPRESS~EVENT~0~%%%">"#),
            r#"<a onclick="%%%~COMPRESS~EVENT~0~%%%">"#
        );
    }

    #[test]
    fn test_remove_quotes_leaves_nested_quotes() {
        let config = only(|c| c.remove_quotes = true);
        assert_eq!(run(&config, r#"<a title='x="y"'>"#), r#"<a title='x="y"'>"#);
        assert_eq!(
            run(&config, r#"<a title="it's" data-a='b="c"' id="n">"#),
            r#"<a title="it's" data-a='b="c"' id=n>"#
        );
    }

    #[test]
    fn test_remove_surrounding_spaces() {
        let config = HtmlCompressorConfig {
            remove_surrounding_spaces: Some(SurroundingSpaces::Min),
            ..only(|_| {})
        };
        let pattern = &*SURROUNDING_SPACES_MIN;
        let out = ResidualPipeline::new(&config, Some(pattern)).run("<p> a </p> <b> c </b>");
        assert_eq!(out, "<p>a</p><b> c </b>");
    }

    #[test]
    fn test_passes_are_idempotent() {
        let config = HtmlCompressorConfig::aggressive();
        let pattern = &*SURROUNDING_SPACES_MAX;
        let pipeline = ResidualPipeline::new(&config, Some(pattern));
        let html = r#"<!doctype html> <html> <body> <form method="get"> <input type="text" checked="checked" value="v" />
            <a href="http://a.b" class = "x" >link</a> <!-- gone --> </form> </body> </html>"#;

        let once = pipeline.run(html);
        assert_eq!(pipeline.run(&once), once);
    }

    #[test]
    fn test_trim_tag_end() {
        assert_eq!(trim_tag_end("<p >"), "<p>");
        assert_eq!(trim_tag_end("<p>"), "<p>");
        assert_eq!(trim_tag_end("< >"), "< >");
        assert_eq!(trim_tag_end("<img src=x  />"), "<img src=x />");
    }
}
