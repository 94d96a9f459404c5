//! Diagnostics for manifests that fail to load.
//!
//! Syntax errors point at the offending character of the manifest text;
//! schema errors only carry a hint, since `serde_json` reports no position
//! for a value converted from YAML.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Diagnostic, NamedSource, SourceSpan};
use semver::Version;
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

use super::hints::{DATA_HINTS, YAML_HINTS};

const TAB_HINT: &str = "Use spaces for indentation; tabs are invalid in YAML.";

/// Path a manifest is reported under.
///
/// # Examples
/// ```rust
/// use modgraph::manifest::ManifestName;
/// let name = ManifestName::new("svc/Modfile");
/// assert_eq!(name.to_string(), "svc/Modfile");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestName(Utf8PathBuf);

impl ManifestName {
    /// Name a manifest after `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self(path.into())
    }

    /// The reported path.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }
}

impl std::fmt::Display for ManifestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Manifest text together with the name it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct ManifestSource<'a> {
    name: &'a ManifestName,
    text: &'a str,
}

impl<'a> ManifestSource<'a> {
    /// Pair `text` with `name`.
    #[must_use]
    pub const fn new(name: &'a ManifestName, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Name the text is reported under.
    #[must_use]
    pub const fn name(&self) -> &'a ManifestName {
        self.name
    }

    /// Raw manifest text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of a 1-based `line` and `column`, clamped to the end of
    /// the line and of the text.
    fn offset_of(&self, line: u64, column: u64) -> usize {
        let line_start: usize = self
            .text
            .split_inclusive('\n')
            .take(zero_based(line))
            .map(str::len)
            .sum();
        let text = self
            .text
            .get(line_start..)
            .and_then(|rest| rest.split('\n').next())
            .unwrap_or_default();
        let within = text
            .char_indices()
            .nth(zero_based(column))
            .map_or(text.len(), |(at, _)| at);
        line_start + within
    }

    /// One-byte label on the character at `line` and `column`. At a line end
    /// the label moves back onto the last character of the line.
    fn label_span(&self, line: u64, column: u64) -> SourceSpan {
        let at = self.offset_of(line, column);
        let bytes = self.text.as_bytes();
        if bytes.get(at).is_some_and(|b| *b != b'\n') {
            return SourceSpan::new(at.into(), 1);
        }
        let prev = at.checked_sub(1).filter(|p| bytes.get(*p).is_some_and(|b| *b != b'\n'));
        prev.map_or_else(|| SourceSpan::new(at.into(), 0), |p| SourceSpan::new(p.into(), 1))
    }

    fn indent_has_tab(&self, loc: Location) -> bool {
        self.text.lines().nth(zero_based(loc.line())).is_some_and(|line| {
            line.chars()
                .take_while(|c| c.is_whitespace())
                .any(|c| c == '\t')
        })
    }
}

fn zero_based(one_based: u64) -> usize {
    usize::try_from(one_based.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn hint_for(table: &[(&str, &str)], message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    table
        .iter()
        .find(|(needle, _)| lower.contains(&needle.to_lowercase()))
        .map(|(_, hint)| (*hint).to_owned())
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(modgraph::manifest::syntax))]
struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("invalid YAML here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(modgraph::manifest::schema))]
struct SchemaDiagnostic {
    #[help]
    help: Option<String>,
    #[source]
    source: serde_json::Error,
    message: String,
}

/// A manifest could not be loaded.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The YAML is malformed or does not fit the schema.
    #[error("manifest parse error")]
    #[diagnostic(code(modgraph::manifest::parse))]
    Parse {
        /// Detailed diagnostic with location and hint.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// The manifest declares a format this build does not understand.
    #[error("{name}: unsupported modgraph_version {found}; expected 1.x")]
    #[diagnostic(
        code(modgraph::manifest::version),
        help("Set `modgraph_version` to a 1.x release such as \"1.0.0\".")
    )]
    UnsupportedVersion {
        /// Manifest display name.
        name: String,
        /// Declared version.
        found: Version,
    },
}

/// Wrap a YAML syntax error with its location and a hint.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    manifest: ManifestSource<'_>,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let detail = err.to_string();
    let help = match loc {
        Some(l) if manifest.indent_has_tab(l) => Some(TAB_HINT.to_owned()),
        _ => hint_for(&YAML_HINTS, &detail),
    };
    let (line, column) = loc.map_or((1, 1), |l| (l.line(), l.column()));
    Box::new(SyntaxDiagnostic {
        src: NamedSource::new(manifest.name().to_string(), manifest.text().to_owned()),
        span: loc.map(|l| manifest.label_span(l.line(), l.column())),
        help,
        message: format!("YAML parse error at line {line}, column {column}: {detail}"),
        source: err,
    })
}

/// Wrap a schema mismatch with a hint.
#[must_use]
pub fn map_data_error(
    err: serde_json::Error,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    Box::new(SchemaDiagnostic {
        help: hint_for(&DATA_HINTS, &err.to_string()),
        message: format!("manifest structure error in {name}: {err}"),
        source: err,
    })
}
