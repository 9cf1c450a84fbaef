//! Directive parser and region rewriter for markdown inlining.
//!
//! Markdown files can carry one-line HTML-comment directives that mark a
//! region whose body is managed by this crate:
//!
//! ```markdown
//! <!-- <inline src="demo.py" lang="python" start="2" end="12"> -->
//! ...replaced on every run...
//! <!-- </inline> -->
//! ```
//!
//! [`Rewriter::process`] walks the document line by line, locates each
//! opening/closing marker pair and splices the referenced slice of the source
//! file between the markers, optionally wrapped in a fenced code block. The
//! markers themselves are left untouched, so the output is a valid input for
//! the next run.
//!
//! # Example
//!
//! ```
//! use mdinline_engine::{Rewriter, RewriterConfig};
//!
//! let config = RewriterConfig::new().with_read_file(|_| Ok("fn main() {}".to_owned()));
//! let mut rewriter = Rewriter::with_config(config);
//!
//! let input = "<!-- <inline src=\"main.rs\" lang=\"rust\"> -->\n<!-- </inline> -->\n";
//! let output = rewriter.process(input).unwrap();
//! assert!(output.contains("```rust\nfn main() {}\n```"));
//! ```

mod directive;
mod error;
mod parser;
mod rewriter;

pub use directive::Directive;
pub use error::InlineError;
pub use parser::{DirectiveParser, ParsedLine, ParserConfig, TagSpec};
pub use rewriter::{ReadFileFn, Rewriter, RewriterConfig};
