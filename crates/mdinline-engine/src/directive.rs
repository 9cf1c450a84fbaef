//! Canonical directive representation.
//!
//! Tag sugar is resolved here: a `python` directive is stored with
//! `lang="python"` and `verbatim` set, so the rewriter never branches on
//! which tag opened the region.

use crate::error::InlineError;
use crate::parser::TagSpec;

/// A decoded opening directive in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Path of the file to include, as written in the directive.
    pub src: String,
    /// Wrap the included content in a fenced code block.
    pub verbatim: bool,
    /// Info string for the fence (present implies `verbatim`).
    pub lang: Option<String>,
    /// First included line of the source file (1-based, inclusive).
    pub start: Option<usize>,
    /// Last included line of the source file (1-based, inclusive).
    pub end: Option<usize>,
    /// Line number where the directive appears (1-indexed).
    pub lineno: usize,
    /// The raw marker line, kept for error reporting.
    pub line: String,
}

impl Directive {
    /// Build a directive from a recognized tag and its scanned attributes.
    ///
    /// Validates that `src` is present and that `start`/`end` are positive
    /// integers, and applies the tag's implied fence language. Unknown
    /// attributes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`InlineError::Directive`] when `src` is missing or a range
    /// attribute has an invalid value.
    pub(crate) fn from_attrs(
        tag: &TagSpec,
        attrs: &[(String, Option<String>)],
        lineno: usize,
        line: &str,
    ) -> Result<Self, InlineError> {
        let value_of = |name: &str| {
            attrs
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, v)| v.as_deref())
        };
        let has = |name: &str| attrs.iter().any(|(n, _)| n == name);

        let Some(src) = value_of("src") else {
            return Err(InlineError::Directive {
                lineno,
                line: line.to_owned(),
                message: format!("attribute 'src' not set for {} directive", tag.name),
            });
        };

        let mut verbatim = has("verbatim") || has("lang");
        let mut lang = value_of("lang").map(ToOwned::to_owned);

        // Tag sugar: an implied language wins over an explicit one.
        if let Some(implied) = &tag.implied_lang {
            verbatim = true;
            lang = Some(implied.clone());
        }

        Ok(Self {
            src: src.to_owned(),
            verbatim,
            lang,
            start: parse_bound(value_of("start"), "start", lineno, line)?,
            end: parse_bound(value_of("end"), "end", lineno, line)?,
            lineno,
            line: line.to_owned(),
        })
    }
}

/// Parse a 1-based line bound. Non-numeric, zero, or negative values are
/// parse errors rather than silently defaulted.
fn parse_bound(
    value: Option<&str>,
    name: &str,
    lineno: usize,
    line: &str,
) -> Result<Option<usize>, InlineError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(InlineError::Directive {
            lineno,
            line: line.to_owned(),
            message: format!("invalid value '{value}' for {name} attribute"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_tag() -> TagSpec {
        TagSpec {
            name: "inline".to_owned(),
            implied_lang: None,
        }
    }

    fn python_tag() -> TagSpec {
        TagSpec {
            name: "python".to_owned(),
            implied_lang: Some("python".to_owned()),
        }
    }

    fn attr(name: &str, value: &str) -> (String, Option<String>) {
        (name.to_owned(), Some(value.to_owned()))
    }

    fn flag(name: &str) -> (String, Option<String>) {
        (name.to_owned(), None)
    }

    #[test]
    fn test_src_only() {
        let d = Directive::from_attrs(&inline_tag(), &[attr("src", "a.md")], 1, "<line>").unwrap();
        assert_eq!(d.src, "a.md");
        assert!(!d.verbatim);
        assert_eq!(d.lang, None);
        assert_eq!(d.start, None);
        assert_eq!(d.end, None);
    }

    #[test]
    fn test_missing_src() {
        let err = Directive::from_attrs(&inline_tag(), &[flag("verbatim")], 3, "<line>");
        match err {
            Err(InlineError::Directive {
                lineno, message, ..
            }) => {
                assert_eq!(lineno, 3);
                assert!(message.contains("'src' not set"));
            }
            other => panic!("expected directive error, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_src_is_missing() {
        // `src` without a value carries no path.
        let err = Directive::from_attrs(&inline_tag(), &[flag("src")], 1, "<line>");
        assert!(err.is_err());
    }

    #[test]
    fn test_verbatim_flag() {
        let d = Directive::from_attrs(
            &inline_tag(),
            &[attr("src", "a"), flag("verbatim")],
            1,
            "<line>",
        )
        .unwrap();
        assert!(d.verbatim);
        assert_eq!(d.lang, None);
    }

    #[test]
    fn test_lang_implies_verbatim() {
        let d = Directive::from_attrs(
            &inline_tag(),
            &[attr("src", "a"), attr("lang", "java")],
            1,
            "<line>",
        )
        .unwrap();
        assert!(d.verbatim);
        assert_eq!(d.lang.as_deref(), Some("java"));
    }

    #[test]
    fn test_python_sugar() {
        let d = Directive::from_attrs(&python_tag(), &[attr("src", "a.py")], 1, "<line>").unwrap();
        assert!(d.verbatim);
        assert_eq!(d.lang.as_deref(), Some("python"));
    }

    #[test]
    fn test_python_overrides_explicit_lang() {
        let d = Directive::from_attrs(
            &python_tag(),
            &[attr("src", "a.py"), attr("lang", "java")],
            1,
            "<line>",
        )
        .unwrap();
        assert_eq!(d.lang.as_deref(), Some("python"));
    }

    #[test]
    fn test_range_values() {
        let d = Directive::from_attrs(
            &inline_tag(),
            &[attr("src", "a"), attr("start", "2"), attr("end", "12")],
            1,
            "<line>",
        )
        .unwrap();
        assert_eq!(d.start, Some(2));
        assert_eq!(d.end, Some(12));
    }

    #[test]
    fn test_non_numeric_start() {
        let err = Directive::from_attrs(
            &inline_tag(),
            &[attr("src", "a"), attr("start", "two")],
            1,
            "<line>",
        );
        match err {
            Err(InlineError::Directive { message, .. }) => {
                assert!(message.contains("invalid value 'two' for start"));
            }
            other => panic!("expected directive error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_and_negative_bounds_rejected() {
        for bad in ["0", "-1"] {
            let err = Directive::from_attrs(
                &inline_tag(),
                &[attr("src", "a"), attr("end", bad)],
                1,
                "<line>",
            );
            assert!(err.is_err(), "end={bad} should be rejected");
        }
    }

    #[test]
    fn test_unknown_attrs_ignored() {
        let d = Directive::from_attrs(
            &inline_tag(),
            &[attr("src", "a"), attr("future", "x"), flag("other")],
            1,
            "<line>",
        )
        .unwrap();
        assert_eq!(d.src, "a");
        assert!(!d.verbatim);
    }
}
