//! Error types raised while resolving module source patterns.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

/// A glob pattern that could not be turned into a list of files.
///
/// Every variant names the offending pattern so callers can report which
/// entry of `srcs` or `srcsExclude` failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SourceError {
    /// The glob engine rejected the pattern syntax.
    #[error("invalid glob pattern '{pattern}': {detail}")]
    #[diagnostic(code(modgraph::sources::invalid_pattern))]
    InvalidPattern {
        /// Pattern as written in the manifest.
        pattern: String,
        /// Reason reported by the glob engine.
        detail: String,
    },

    /// A `{` or `}` without a partner.
    #[error("invalid glob pattern '{pattern}': unmatched '{character}' at position {position}")]
    #[diagnostic(code(modgraph::sources::unmatched_brace))]
    UnmatchedBrace {
        /// Pattern as written in the manifest.
        pattern: String,
        /// The unmatched brace character.
        character: char,
        /// Byte offset of the brace within the pattern.
        position: usize,
    },

    /// The pattern is valid but matched no files.
    #[error("glob pattern '{pattern}' matched no files")]
    #[diagnostic(
        code(modgraph::sources::no_matches),
        help("check the pattern is relative to the module directory")
    )]
    NoMatches {
        /// Pattern as written in the manifest.
        pattern: String,
    },

    /// Filesystem access failed while walking the pattern.
    #[error("glob failed for '{pattern}': {detail}")]
    #[diagnostic(code(modgraph::sources::io))]
    Io {
        /// Pattern as written in the manifest.
        pattern: String,
        /// Underlying I/O failure.
        detail: String,
    },
}

impl SourceError {
    /// The pattern that triggered the error.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPattern { pattern, .. }
            | Self::UnmatchedBrace { pattern, .. }
            | Self::NoMatches { pattern }
            | Self::Io { pattern, .. } => pattern,
        }
    }

    pub(super) fn invalid(pattern: &str, detail: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            detail: detail.into(),
        }
    }

    pub(super) fn io(pattern: &str, detail: impl Into<String>) -> Self {
        Self::Io {
            pattern: pattern.to_owned(),
            detail: detail.into(),
        }
    }
}
