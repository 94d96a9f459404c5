//! In-memory file tree for tests and dry runs.
use super::{GlobWalker, MATCH_OPTIONS, SourceError, normalize, validate::validate_brace_matching};
use camino::Utf8PathBuf;
use std::collections::BTreeSet;

/// A fixed set of file paths that patterns are matched against.
///
/// Paths are kept sorted, mirroring the per-directory ordering of the
/// filesystem walker.
///
/// # Examples
///
/// ```
/// use modgraph::sources::{GlobWalker, MemoryTree};
///
/// let tree = MemoryTree::new(["main.go", "main_test.go", "README.md"]);
/// let matches = tree.expand("*.go").expect("valid pattern");
/// assert_eq!(matches.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    files: BTreeSet<Utf8PathBuf>,
}

impl MemoryTree {
    /// Build a tree from the given file paths.
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a single file to the tree.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>) {
        self.files.insert(path.into());
    }

    /// Number of files in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when the tree holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl GlobWalker for MemoryTree {
    fn expand(&self, pattern: &str) -> Result<Vec<Utf8PathBuf>, SourceError> {
        validate_brace_matching(pattern)?;
        let compiled = glob::Pattern::new(&normalize::force_literal_escapes(pattern))
            .map_err(|e| SourceError::invalid(pattern, e.to_string()))?;
        Ok(self
            .files
            .iter()
            .filter(|file| compiled.matches_with(file.as_str(), MATCH_OPTIONS))
            .cloned()
            .collect())
    }
}
