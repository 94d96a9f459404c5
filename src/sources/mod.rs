//! Source resolution for module descriptors.
//!
//! A module lists its inputs as ordered glob patterns (`srcs`) and exclusion
//! globs (`srcsExclude`). [`SourceResolver`] expands them through a
//! [`GlobWalker`] into a deduplicated, ordered [`ResolvedSources`] set and
//! marks which files are tests by naming convention.
//!
//! Every pattern is evaluated even after a failure so a module reports all
//! of its broken patterns at once.

use camino::{Utf8Path, Utf8PathBuf};
use glob::MatchOptions;
use indexmap::IndexSet;

mod errors;
mod memory;
mod normalize;
mod validate;
mod walk;

pub use errors::SourceError;
pub use memory::MemoryTree;
pub use walk::FsWalker;

pub(crate) use normalize::is_current_dir;

/// Matching rules shared by every walker: case sensitive, `*` stays within a
/// path segment, dot files are matched.
pub(crate) const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Default marker identifying test files (`main_test.go`).
pub const DEFAULT_TEST_MARKER: &str = "_test";

/// The glob primitive used to turn a pattern into concrete paths.
///
/// Implementations must be shareable across worker threads since modules
/// are resolved in parallel.
pub trait GlobWalker: Sync {
    /// Expand `pattern` into the files it matches.
    ///
    /// An empty result is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the pattern is malformed or the
    /// underlying storage cannot be read.
    fn expand(&self, pattern: &str) -> Result<Vec<Utf8PathBuf>, SourceError>;
}

/// Naming convention that classifies a file as a test.
///
/// A file is a test when its stem ends with the marker, so with the default
/// `_test` marker `main_test.go` is a test and `testdata.go` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFileConvention {
    marker: String,
}

impl TestFileConvention {
    /// Use `marker` as the stem suffix for test files.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The stem suffix in use.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Classify `path` purely from its file name.
    #[must_use]
    pub fn is_test(&self, path: &Utf8Path) -> bool {
        path.file_stem()
            .is_some_and(|stem| stem.ends_with(&self.marker))
    }
}

impl Default for TestFileConvention {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_MARKER)
    }
}

/// A resolved file and its test classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the workspace root.
    pub path: Utf8PathBuf,
    /// Whether the file follows the test naming convention.
    pub is_test: bool,
}

/// Ordered, deduplicated files matched for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSources {
    files: Vec<SourceFile>,
}

impl ResolvedSources {
    /// All resolved files in first-seen order.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Every resolved path, tests included.
    #[must_use]
    pub fn all_paths(&self) -> Vec<Utf8PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Resolved paths that are not tests.
    #[must_use]
    pub fn non_test_paths(&self) -> Vec<Utf8PathBuf> {
        self.files
            .iter()
            .filter(|f| !f.is_test)
            .map(|f| f.path.clone())
            .collect()
    }

    /// Number of resolved files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when exclusions removed every match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Expands module source patterns through a [`GlobWalker`].
///
/// # Examples
///
/// ```
/// use camino::{Utf8Path, Utf8PathBuf};
/// use modgraph::sources::{MemoryTree, SourceResolver, TestFileConvention};
///
/// let tree = MemoryTree::new(["main.go", "main_test.go"]);
/// let convention = TestFileConvention::default();
/// let resolver = SourceResolver::new(&tree, &convention);
/// let sources = resolver
///     .resolve(Utf8Path::new("."), &["*.go".into()], &[])
///     .expect("resolve");
/// assert_eq!(sources.non_test_paths(), vec![Utf8PathBuf::from("main.go")]);
/// ```
#[derive(Clone, Copy)]
pub struct SourceResolver<'a> {
    walker: &'a dyn GlobWalker,
    convention: &'a TestFileConvention,
}

impl<'a> SourceResolver<'a> {
    /// Create a resolver over `walker` classifying tests with `convention`.
    #[must_use]
    pub fn new(walker: &'a dyn GlobWalker, convention: &'a TestFileConvention) -> Self {
        Self { walker, convention }
    }

    /// Resolve `patterns` minus `excludes`, both relative to `dir`.
    ///
    /// Matches are concatenated in pattern order and deduplicated keeping
    /// the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns every [`SourceError`] encountered. A pattern that matches no
    /// files counts as an error; a pattern whose matches are all excluded
    /// does not.
    pub fn resolve(
        &self,
        dir: &Utf8Path,
        patterns: &[String],
        excludes: &[String],
    ) -> Result<ResolvedSources, Vec<SourceError>> {
        let mut errors = Vec::new();
        let exclusions = compile_exclusions(dir, excludes, &mut errors);
        let mut seen: IndexSet<Utf8PathBuf> = IndexSet::new();

        for pattern in patterns {
            if let Err(err) = validate::validate_brace_matching(pattern) {
                errors.push(err);
                continue;
            }
            let scoped = normalize::scope_pattern(dir, pattern);
            match self.walker.expand(&scoped) {
                Ok(matches) if matches.is_empty() => errors.push(SourceError::NoMatches {
                    pattern: pattern.clone(),
                }),
                Ok(matches) => seen.extend(
                    matches
                        .into_iter()
                        .filter(|path| !is_excluded(path, &exclusions)),
                ),
                Err(err) => errors.push(rename_pattern(err, pattern)),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let files = seen
            .into_iter()
            .map(|path| SourceFile {
                is_test: self.convention.is_test(&path),
                path,
            })
            .collect();
        Ok(ResolvedSources { files })
    }
}

fn compile_exclusions(
    dir: &Utf8Path,
    excludes: &[String],
    errors: &mut Vec<SourceError>,
) -> Vec<glob::Pattern> {
    excludes
        .iter()
        .filter_map(|raw| {
            let compiled = validate::validate_brace_matching(raw).and_then(|()| {
                let scoped = normalize::scope_pattern(dir, raw);
                glob::Pattern::new(&normalize::force_literal_escapes(&scoped))
                    .map_err(|e| SourceError::invalid(raw, e.to_string()))
            });
            compiled.map_err(|err| errors.push(err)).ok()
        })
        .collect()
}

fn is_excluded(path: &Utf8Path, exclusions: &[glob::Pattern]) -> bool {
    exclusions
        .iter()
        .any(|pattern| pattern.matches_with(path.as_str(), MATCH_OPTIONS))
}

/// Report errors against the pattern as written, not its scoped form.
fn rename_pattern(err: SourceError, written: &str) -> SourceError {
    let pattern = written.to_owned();
    match err {
        SourceError::InvalidPattern { detail, .. } => SourceError::InvalidPattern { pattern, detail },
        SourceError::UnmatchedBrace {
            character,
            position,
            ..
        } => SourceError::UnmatchedBrace {
            pattern,
            character,
            position,
        },
        SourceError::NoMatches { .. } => SourceError::NoMatches { pattern },
        SourceError::Io { detail, .. } => SourceError::Io { pattern, detail },
    }
}
