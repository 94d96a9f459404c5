//! Resolved run configuration.
//!
//! [`Config`] is derived from the parsed [`Cli`] once. Every relative path
//! the user supplies is interpreted against the workspace directory, so the
//! rest of the run never consults the process working directory.

use camino::{Utf8Path, Utf8PathBuf};

use crate::cli::Cli;
use crate::layout::OutputLayout;
use crate::sources::TestFileConvention;

/// File name of the generated Ninja file inside the output directory.
pub const NINJA_FILE: &str = "build.ninja";

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory source patterns and outputs are relative to.
    pub workspace: Utf8PathBuf,
    /// Manifest path as opened.
    pub manifest: Utf8PathBuf,
    /// Output path mapping, relative to the workspace.
    pub layout: OutputLayout,
    /// Test-file classification.
    pub convention: TestFileConvention,
    /// Worker thread limit; `None` uses every core.
    pub jobs: Option<usize>,
    /// Write output despite module errors.
    pub keep_going: bool,
}

impl Config {
    /// Derive the configuration from parsed arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use modgraph::cli::Cli;
    /// use modgraph::config::Config;
    ///
    /// let cli = Cli { directory: Some("ws".into()), ..Cli::default() };
    /// let config = Config::from_cli(&cli);
    /// assert_eq!(config.manifest, "ws/Modfile");
    /// assert_eq!(config.default_ninja_path(), "ws/out/build.ninja");
    /// ```
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let workspace = cli
            .directory
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        let manifest = resolve_in(&workspace, &cli.file);
        Self {
            manifest,
            layout: OutputLayout::new(cli.out_dir.clone(), cli.namespace.clone()),
            convention: TestFileConvention::new(cli.test_marker.clone()),
            jobs: cli.jobs,
            keep_going: cli.keep_going,
            workspace,
        }
    }

    /// Resolve a user-supplied path against the workspace.
    #[must_use]
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        resolve_in(&self.workspace, path)
    }

    /// Where `generate` writes when no file is given.
    #[must_use]
    pub fn default_ninja_path(&self) -> Utf8PathBuf {
        self.resolve(&self.layout.base_dir().join(NINJA_FILE))
    }
}

fn resolve_in(workspace: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() || crate::sources::is_current_dir(workspace) {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "Modfile", "Modfile")]
    #[case(Some("work"), "Modfile", "work/Modfile")]
    #[case(Some("work"), "/tmp/Modfile", "/tmp/Modfile")]
    fn manifest_path_respects_directory(
        #[case] directory: Option<&str>,
        #[case] file: &str,
        #[case] expected: &str,
    ) {
        let cli = Cli {
            directory: directory.map(Utf8PathBuf::from),
            file: Utf8PathBuf::from(file),
            ..Cli::default()
        };
        assert_eq!(Config::from_cli(&cli).manifest, Utf8PathBuf::from(expected));
    }

    #[test]
    fn layout_and_convention_follow_flags() {
        let cli = Cli {
            out_dir: "build".into(),
            namespace: "acme".into(),
            test_marker: "_spec".into(),
            jobs: Some(2),
            ..Cli::default()
        };
        let config = Config::from_cli(&cli);
        assert_eq!(config.layout.binary("svc"), Utf8PathBuf::from("build/bin/acme/svc"));
        assert_eq!(config.convention.marker(), "_spec");
        assert_eq!(config.jobs, Some(2));
        assert_eq!(config.default_ninja_path(), Utf8PathBuf::from("build/build.ninja"));
    }
}
