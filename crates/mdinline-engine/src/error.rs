//! Error types for directive parsing and region rewriting.

use std::io;
use std::path::PathBuf;

/// Error during directive parsing or region rewriting.
///
/// Every variant is fatal to the whole run: the rewriter never produces
/// partial output, so a caller that receives an error can leave the target
/// document untouched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InlineError {
    /// Malformed directive line (bad attribute syntax, missing `src`,
    /// invalid `start`/`end` value).
    #[error("line {lineno}: {message}\n{line}")]
    Directive {
        /// Line number of the offending line (1-indexed).
        lineno: usize,
        /// The offending line.
        line: String,
        /// What was wrong with it.
        message: String,
    },

    /// An opening marker was found while a previous region was still open.
    #[error("line {lineno}: new directive opened while directive at line {open_lineno} is still open\n{line}")]
    NestedOpen {
        /// Line number of the second opening marker.
        lineno: usize,
        /// Line number of the region that was still open.
        open_lineno: usize,
        /// The offending line.
        line: String,
    },

    /// A closing marker was found outside any region.
    #[error("line {lineno}: closing directive without a matching opening directive\n{line}")]
    StrayClose {
        /// Line number of the closing marker.
        lineno: usize,
        /// The offending line.
        line: String,
    },

    /// End of input was reached with a region still open.
    #[error("line {lineno}: directive not closed at end of input\n{line}")]
    Unterminated {
        /// Line number of the unclosed opening marker.
        lineno: usize,
        /// The unclosed opening line.
        line: String,
    },

    /// A `src` file could not be read.
    #[error("failed to read source file {}", .path.display())]
    Source {
        /// Resolved path of the source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
