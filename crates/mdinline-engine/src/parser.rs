//! Directive line recognition.
//!
//! A directive is a single-line HTML comment whose payload is an opening tag
//! with attributes (`<inline src="..." verbatim>`) or a closing tag
//! (`</inline>`). Lines that are not comments, or whose payload opens an
//! unrecognized tag, are not directives and pass through untouched.

use crate::directive::Directive;
use crate::error::InlineError;

/// A recognized opening tag and the fence language it implies.
///
/// The implied language models sugar tags: `<python src="...">` behaves as
/// `<inline src="..." lang="python">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    /// Tag name as it appears in the directive.
    pub name: String,
    /// Fence language applied when this tag opens a region.
    pub implied_lang: Option<String>,
}

/// Immutable parser configuration: the set of recognized directive tags.
///
/// Passed into [`DirectiveParser::new`] so the recognized-tag table is
/// explicit state rather than a process-wide constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Recognized opening tags. A closing tag `</name>` of any entry closes
    /// the open region regardless of which entry opened it.
    pub tags: Vec<TagSpec>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tags: vec![
                TagSpec {
                    name: "inline".to_owned(),
                    implied_lang: None,
                },
                TagSpec {
                    name: "python".to_owned(),
                    implied_lang: Some("python".to_owned()),
                },
            ],
        }
    }
}

impl ParserConfig {
    fn find(&self, name: &str) -> Option<&TagSpec> {
        self.tags.iter().find(|t| t.name == name)
    }
}

/// A recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Opening marker with its decoded directive.
    Open(Directive),
    /// Closing marker.
    Close,
}

/// Recognizes and decodes one-line directive comments.
#[derive(Debug, Clone, Default)]
pub struct DirectiveParser {
    config: ParserConfig,
}

impl DirectiveParser {
    /// Create a parser recognizing the tags in `config`.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a line for directive syntax.
    ///
    /// Returns `Ok(None)` if the line is not a directive. A line that opens
    /// a recognized tag but is malformed (missing `src`, unterminated quote,
    /// invalid range value) is an error.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::Directive`] for malformed directive lines.
    pub fn parse_line(&self, line: &str, lineno: usize) -> Result<Option<ParsedLine>, InlineError> {
        let Some(payload) = extract_comment(line) else {
            return Ok(None);
        };
        let Some(inner) = payload.strip_prefix('<') else {
            return Ok(None);
        };

        if let Some(closing) = inner.strip_prefix('/') {
            let Some(name) = closing.strip_suffix('>') else {
                return Ok(None);
            };
            if self.config.find(name).is_some() {
                return Ok(Some(ParsedLine::Close));
            }
            return Ok(None);
        }

        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(inner.len());
        let Some(tag) = self.config.find(&inner[..name_end]) else {
            return Ok(None);
        };

        let attrs = scan_attrs(&inner[name_end..], line, lineno)?;
        let directive = Directive::from_attrs(tag, &attrs, lineno, line)?;
        Ok(Some(ParsedLine::Open(directive)))
    }
}

/// Strip the comment markers from a single-line HTML comment.
///
/// Returns the trimmed payload between `<!--` and the first `-->`, or `None`
/// if the line is not a comment. Content after `-->` is ignored.
fn extract_comment(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("<!--")?;
    let end = rest.find("-->")?;
    Some(rest[..end].trim())
}

/// Scan the attribute list of an opening tag, up to the closing `>`.
///
/// Supports `name="value"`, `name='value'`, `name=value` and bare boolean
/// flags, in any order.
fn scan_attrs(
    rest: &str,
    line: &str,
    lineno: usize,
) -> Result<Vec<(String, Option<String>)>, InlineError> {
    let malformed = |message: String| InlineError::Directive {
        lineno,
        line: line.to_owned(),
        message,
    };

    let mut attrs = Vec::new();
    let mut s = rest;
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return Err(malformed("directive is missing a closing '>'".to_owned()));
        }
        if s.starts_with('>') {
            return Ok(attrs);
        }

        let name_end = s
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(s.len());
        if name_end == 0 {
            let c = s.chars().next().unwrap_or_default();
            return Err(malformed(format!("unexpected character '{c}' in directive")));
        }
        let name = &s[..name_end];
        s = &s[name_end..];

        if let Some(after_eq) = s.strip_prefix('=') {
            let (value, rest) = scan_value(after_eq)
                .ok_or_else(|| malformed(format!("unterminated value for attribute '{name}'")))?;
            attrs.push((name.to_owned(), Some(value.to_owned())));
            s = rest;
        } else {
            attrs.push((name.to_owned(), None));
        }
    }
}

/// Scan one attribute value: double-quoted, single-quoted, or unquoted.
///
/// Returns the value and the remaining input, or `None` on an unterminated
/// quote.
fn scan_value(s: &str) -> Option<(&str, &str)> {
    if let Some(stripped) = s.strip_prefix('"') {
        let end = stripped.find('"')?;
        Some((&stripped[..end], &stripped[end + 1..]))
    } else if let Some(stripped) = s.strip_prefix('\'') {
        let end = stripped.find('\'')?;
        Some((&stripped[..end], &stripped[end + 1..]))
    } else {
        let end = s
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(s.len());
        Some((&s[..end], &s[end..]))
    }
}
