//! Filesystem-backed glob expansion.
use super::{GlobWalker, MATCH_OPTIONS, SourceError, normalize, validate::validate_brace_matching};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use std::path::PathBuf;

/// Expands patterns against the real filesystem beneath a workspace root.
///
/// Matches are reported relative to the root so the generated graph can be
/// executed from the workspace directory. Directories are skipped.
#[derive(Debug)]
pub struct FsWalker {
    root: Utf8PathBuf,
    dir: Dir,
}

impl FsWalker {
    /// Open `root` as the base directory for relative patterns.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be opened.
    pub fn open(root: impl Into<Utf8PathBuf>) -> std::io::Result<Self> {
        let root_path = root.into();
        let dir = Dir::open_ambient_dir(root_path.as_std_path(), ambient_authority())?;
        Ok(Self {
            root: root_path,
            dir,
        })
    }

    /// The workspace root this walker resolves against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn rooted_pattern(&self, pattern: &str) -> String {
        if Utf8Path::new(pattern).is_absolute() || normalize::is_current_dir(&self.root) {
            return pattern.to_owned();
        }
        let base = glob::Pattern::escape(self.root.as_str().trim_end_matches('/'));
        format!("{base}/{pattern}")
    }

    fn relativise(&self, path: Utf8PathBuf) -> Utf8PathBuf {
        if normalize::is_current_dir(&self.root) {
            return path;
        }
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path,
        }
    }

    fn process_entry(
        &self,
        entry: Result<PathBuf, glob::GlobError>,
        pattern: &str,
    ) -> Result<Option<Utf8PathBuf>, SourceError> {
        let path = entry.map_err(|e| SourceError::io(pattern, e.to_string()))?;
        let utf_path = Utf8PathBuf::try_from(path)
            .map_err(|_| SourceError::io(pattern, "glob matched a non-UTF-8 path"))?;
        let rel = self.relativise(utf_path.clone());
        let is_file = fetch_metadata(&self.dir, &rel)
            .map(|m| m.is_file())
            .or_else(|_| escaped_is_file(&utf_path))
            .map_err(|e| SourceError::io(pattern, e.to_string()))?;
        if !is_file {
            return Ok(None);
        }
        let rel_path = rel.as_str().strip_prefix("./").unwrap_or(rel.as_str());
        Ok(Some(Utf8PathBuf::from(rel_path.replace('\\', "/"))))
    }
}

impl GlobWalker for FsWalker {
    fn expand(&self, pattern: &str) -> Result<Vec<Utf8PathBuf>, SourceError> {
        validate_brace_matching(pattern)?;
        let rooted = self.rooted_pattern(&normalize::force_literal_escapes(pattern));
        let entries = glob::glob_with(&rooted, MATCH_OPTIONS)
            .map_err(|e| SourceError::invalid(pattern, e.to_string()))?;
        let mut paths = Vec::new();
        for entry in entries {
            if let Some(path) = self.process_entry(entry, pattern)? {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

fn fetch_metadata(root: &Dir, path: &Utf8Path) -> std::io::Result<cap_std::fs::Metadata> {
    if path.is_absolute() {
        let stripped = path.as_str().trim_start_matches(['/', '\\']);
        let fs_root = Dir::open_ambient_dir("/", ambient_authority())?;
        if stripped.is_empty() {
            fs_root.metadata(".")
        } else {
            fs_root.metadata(stripped)
        }
    } else {
        root.metadata(path.as_std_path())
    }
}

/// Symlinks that leave the workspace are refused by the capability handle;
/// follow them through the ambient filesystem instead.
fn escaped_is_file(path: &Utf8Path) -> std::io::Result<bool> {
    std::fs::metadata(path.as_std_path()).map(|m| m.is_file())
}
