//! Region rewriting.
//!
//! Walks a document line by line and replaces the body of every directive
//! region with content sliced from the referenced source file. Single pass:
//! replacement lengths never shift the input positions still being scanned,
//! so later pairs are found at their original line numbers.

use std::io;
use std::path::{Path, PathBuf};

use crate::directive::Directive;
use crate::error::InlineError;
use crate::parser::{DirectiveParser, ParsedLine, ParserConfig};

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send;

/// Configuration for the region rewriter.
pub struct RewriterConfig {
    /// Base directory for resolving `src` paths.
    pub base_dir: PathBuf,
    /// Empty region bodies instead of reading source files.
    pub clean: bool,
    /// Recognized directive tags.
    pub parser: ParserConfig,
    /// Callback to read source files from the file system.
    ///
    /// Default: `std::fs::read_to_string`
    pub read_file: Option<Box<ReadFileFn>>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriterConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            clean: false,
            parser: ParserConfig::default(),
            read_file: None,
        }
    }

    /// Set the base directory for resolving `src` paths.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Enable clean mode: bodies are emptied and no source file is read.
    #[must_use]
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Set the recognized directive tags.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Set the file reading callback.
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }
}

/// Region tracking state. Invalid transitions are parse errors.
#[derive(Debug)]
enum State {
    /// Outside any region; lines pass through.
    Outside,
    /// Inside a region; old body lines are discarded until the closing marker.
    Inside(Directive),
}

/// Rewrites directive regions in a document.
///
/// See the crate docs for the directive syntax. The rewriter is single-use
/// per document in spirit but holds no per-document state between calls;
/// warnings accumulate across calls to [`process`](Self::process).
pub struct Rewriter {
    config: RewriterConfig,
    parser: DirectiveParser,
    warnings: Vec<String>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Rewriter {
    /// Create a rewriter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RewriterConfig::default())
    }

    /// Create a rewriter with custom configuration.
    #[must_use]
    pub fn with_config(config: RewriterConfig) -> Self {
        let parser = DirectiveParser::new(config.parser.clone());
        Self {
            config,
            parser,
            warnings: Vec::new(),
        }
    }

    /// Rewrite every directive region in `input`.
    ///
    /// The output is the full document with each region body replaced; the
    /// marker lines themselves are kept. The input's trailing newline (or its
    /// absence) is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed directives, structural problems
    /// (nested open, stray close, unterminated region) and unreadable source
    /// files. No partial output is produced.
    pub fn process(&mut self, input: &str) -> Result<String, InlineError> {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut state = State::Outside;

        for (idx, line) in lines.iter().enumerate() {
            let lineno = idx + 1;
            match state {
                State::Outside => match self.parser.parse_line(line, lineno)? {
                    Some(ParsedLine::Open(directive)) => {
                        out.push((*line).to_owned());
                        state = State::Inside(directive);
                    }
                    Some(ParsedLine::Close) => {
                        return Err(InlineError::StrayClose {
                            lineno,
                            line: (*line).to_owned(),
                        });
                    }
                    None => out.push((*line).to_owned()),
                },
                State::Inside(ref open) => {
                    // Old body lines are discarded, not re-scanned for
                    // directives: only well-formed marker lines matter here.
                    match self.parser.parse_line(line, lineno) {
                        Ok(Some(ParsedLine::Open(_))) => {
                            return Err(InlineError::NestedOpen {
                                lineno,
                                open_lineno: open.lineno,
                                line: (*line).to_owned(),
                            });
                        }
                        Ok(Some(ParsedLine::Close)) => {
                            out.extend(self.expand(open)?);
                            out.push((*line).to_owned());
                            state = State::Outside;
                        }
                        Ok(None) | Err(_) => {}
                    }
                }
            }
        }

        if let State::Inside(open) = state {
            return Err(InlineError::Unterminated {
                lineno: open.lineno,
                line: open.line,
            });
        }

        let mut output = out.join("\n");
        if input.ends_with('\n') && !out.is_empty() {
            output.push('\n');
        }
        Ok(output)
    }

    /// Get the warnings recorded while processing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Compute the replacement body for a region.
    fn expand(&mut self, directive: &Directive) -> Result<Vec<String>, InlineError> {
        if self.config.clean {
            return Ok(Vec::new());
        }

        let path = self.config.base_dir.join(&directive.src);
        let content = self.read(&path).map_err(|source| InlineError::Source {
            path: path.clone(),
            source,
        })?;
        let source_lines: Vec<&str> = content.lines().collect();
        let total = source_lines.len();

        // 1-based inclusive bounds, clamped to the file rather than erroring
        // so a shrinking source file does not break the run.
        let start = directive.start.unwrap_or(1);
        let end = directive.end.unwrap_or(total).min(total);
        if let Some(requested) = directive.end.filter(|&e| e > total) {
            self.warnings.push(format!(
                "line {}: end {requested} is past the last line of {} ({total} lines), clamped",
                directive.lineno, directive.src
            ));
        }
        let selected: &[&str] = if start <= end {
            &source_lines[start - 1..end]
        } else {
            if directive.start.is_some() || directive.end.is_some() {
                self.warnings.push(format!(
                    "line {}: empty range {}..{} for {}, nothing included",
                    directive.lineno, start, end, directive.src
                ));
            }
            &[]
        };

        let mut body = Vec::with_capacity(selected.len() + 2);
        if directive.verbatim {
            body.push(format!("```{}", directive.lang.as_deref().unwrap_or("")));
        }
        body.extend(selected.iter().map(|l| (*l).to_owned()));
        if directive.verbatim {
            body.push("```".to_owned());
        }
        Ok(body)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        match &self.config.read_file {
            Some(read_file) => read_file(path),
            None => std::fs::read_to_string(path),
        }
    }
}
