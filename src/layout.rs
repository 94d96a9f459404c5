//! Output path derivation.
//!
//! The directory layout under the base output directory is consumed by
//! packaging and report tooling, so it must stay byte-for-byte stable:
//!
//! ```text
//! <base>/bin/<namespace>/<module>         compiled binary
//! <base>/reports/<namespace>/test.txt     test report (shared)
//! <base>/js/<namespace>/<module>.js       JavaScript bundle
//! ```
//!
//! The test report path does not include the module name. Every tested
//! module in a build writes the same file and the last writer wins.

use camino::{Utf8Path, Utf8PathBuf};

use crate::sources::is_current_dir;

/// Default namespace segment inserted below each output category.
pub const DEFAULT_NAMESPACE: &str = "bood";

/// Default base output directory.
pub const DEFAULT_BASE_DIR: &str = "out";

/// Category of output a module produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// The executable built by a compiled-binary module.
    Binary,
    /// The test log written by a compiled-binary module's test step.
    TestReport,
    /// The single file produced by a bundle module.
    Bundle,
}

/// Pure mapping from module identity to output locations.
///
/// # Examples
///
/// ```
/// use modgraph::layout::{OutputKind, OutputLayout};
///
/// let layout = OutputLayout::new("out", "bood");
/// assert_eq!(layout.derive(OutputKind::Binary, "server"), "out/bin/bood/server");
/// assert_eq!(layout.derive(OutputKind::Bundle, "app"), "out/js/bood/app.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base_dir: Utf8PathBuf,
    namespace: String,
}

impl OutputLayout {
    /// Create a layout rooted at `base_dir` using `namespace`.
    #[must_use]
    pub fn new(base_dir: impl Into<Utf8PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            namespace: namespace.into(),
        }
    }

    /// Base output directory.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Namespace segment.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Output path for `kind` produced by the module called `module`.
    #[must_use]
    pub fn derive(&self, kind: OutputKind, module: &str) -> Utf8PathBuf {
        match kind {
            OutputKind::Binary => self.category("bin").join(module),
            OutputKind::TestReport => self.category("reports").join("test.txt"),
            OutputKind::Bundle => self.category("js").join(format!("{module}.js")),
        }
    }

    /// Binary path for `module`.
    #[must_use]
    pub fn binary(&self, module: &str) -> Utf8PathBuf {
        self.derive(OutputKind::Binary, module)
    }

    /// Shared test report path.
    #[must_use]
    pub fn test_report(&self) -> Utf8PathBuf {
        self.derive(OutputKind::TestReport, "")
    }

    /// Bundle path for `module`.
    #[must_use]
    pub fn bundle(&self, module: &str) -> Utf8PathBuf {
        self.derive(OutputKind::Bundle, module)
    }

    fn category(&self, name: &str) -> Utf8PathBuf {
        let category = if is_current_dir(&self.base_dir) {
            Utf8PathBuf::from(name)
        } else {
            self.base_dir.join(name)
        };
        category.join(&self.namespace)
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR, DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("out", OutputKind::Binary, "boodjs", "out/bin/bood/boodjs")]
    #[case("out", OutputKind::TestReport, "boodjs", "out/reports/bood/test.txt")]
    #[case("out", OutputKind::Bundle, "someBood", "out/js/bood/someBood.js")]
    #[case(".", OutputKind::Binary, "tool", "bin/bood/tool")]
    #[case("build/out", OutputKind::Bundle, "app", "build/out/js/bood/app.js")]
    fn derive_follows_layout(
        #[case] base: &str,
        #[case] kind: OutputKind,
        #[case] module: &str,
        #[case] expected: &str,
    ) {
        let layout = OutputLayout::new(base, DEFAULT_NAMESPACE);
        assert_eq!(layout.derive(kind, module), Utf8PathBuf::from(expected));
    }

    #[test]
    fn test_report_ignores_module_name() {
        let layout = OutputLayout::default();
        assert_eq!(
            layout.derive(OutputKind::TestReport, "a"),
            layout.derive(OutputKind::TestReport, "b")
        );
        assert_eq!(layout.test_report(), layout.derive(OutputKind::TestReport, "a"));
    }

    #[test]
    fn namespace_is_configurable() {
        let layout = OutputLayout::new("out", "acme");
        assert_eq!(layout.binary("svc"), Utf8PathBuf::from("out/bin/acme/svc"));
        assert_eq!(layout.namespace(), "acme");
        assert_eq!(layout.base_dir(), Utf8Path::new("out"));
    }
}
