//! Module manifest Abstract Syntax Tree structures.
//!
//! These types mirror the YAML schema of a `Modfile`. They are populated by
//! serde in [`crate::manifest`]; the compiler only ever sees fully typed
//! values and never binds properties itself.
//!
//! ```rust
//! use modgraph::ast::{Manifest, ModuleDescriptor};
//!
//! let yaml = r#"
//! modgraph_version: "1.0.0"
//! modules:
//!   - kind: go_binary
//!     name: server
//!     pkg: ./cmd/server
//!     srcs: ["**/*.go"]
//! "#;
//! let manifest = modgraph::manifest::from_str(yaml).expect("parse");
//! assert!(matches!(&manifest.modules[0], ModuleDescriptor::GoBinary(m) if m.pkg == "./cmd/server"));
//! # let _: &Manifest = &manifest;
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use semver::Version;
use serde::{Deserialize, Serialize};

fn default_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

/// Top-level manifest structure parsed from a `Modfile`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Semantic version of the manifest format.
    pub modgraph_version: Version,

    /// Modules to compile, in declaration order.
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
}

/// One buildable unit. The `kind` key selects the variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleDescriptor {
    /// A Go binary, optionally tested and vendored.
    GoBinary(BinaryModule),
    /// A JavaScript bundle, optionally obfuscated.
    JsBundle(BundleModule),
}

impl ModuleDescriptor {
    /// Unique module name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::GoBinary(m) => &m.name,
            Self::JsBundle(m) => &m.name,
        }
    }

    /// Module source root relative to the workspace.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        match self {
            Self::GoBinary(m) => &m.dir,
            Self::JsBundle(m) => &m.dir,
        }
    }

    /// Source patterns in declaration order.
    #[must_use]
    pub fn srcs(&self) -> &[String] {
        match self {
            Self::GoBinary(m) => &m.srcs,
            Self::JsBundle(m) => &m.srcs,
        }
    }

    /// Exclusion patterns.
    #[must_use]
    pub fn srcs_exclude(&self) -> &[String] {
        match self {
            Self::GoBinary(m) => &m.srcs_exclude,
            Self::JsBundle(m) => &m.srcs_exclude,
        }
    }

    /// Manifest spelling of the module kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::GoBinary(_) => "go_binary",
            Self::JsBundle(_) => "js_bundle",
        }
    }
}

/// Properties of a compiled-binary module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BinaryModule {
    /// Unique module name; also the binary file name.
    pub name: String,
    /// Package passed to the build command.
    pub pkg: String,
    /// Package passed to the test command. Empty disables the test step.
    #[serde(default)]
    pub test_pkg: String,
    /// Source patterns in declaration order.
    pub srcs: Vec<String>,
    /// Patterns removed from the matches of `srcs`.
    #[serde(default)]
    pub srcs_exclude: Vec<String>,
    /// Fetch dependencies into `<dir>/vendor` before building and testing.
    #[serde(default)]
    pub vendor_first: bool,
    /// Module source root relative to the workspace.
    #[serde(default = "default_dir")]
    pub dir: Utf8PathBuf,
}

impl BinaryModule {
    /// Start a binary module description with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, pkg: impl Into<String>, srcs: &[&str]) -> Self {
        Self {
            name: name.into(),
            pkg: pkg.into(),
            test_pkg: String::new(),
            srcs: srcs.iter().map(|s| (*s).to_owned()).collect(),
            srcs_exclude: Vec::new(),
            vendor_first: false,
            dir: default_dir(),
        }
    }

    /// Whether a test action should be emitted.
    #[must_use]
    pub fn has_tests(&self) -> bool {
        !self.test_pkg.is_empty()
    }
}

/// Properties of a bundle module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BundleModule {
    /// Unique module name; also the bundle file stem.
    pub name: String,
    /// Source patterns in declaration order.
    pub srcs: Vec<String>,
    /// Patterns removed from the matches of `srcs`.
    #[serde(default)]
    pub srcs_exclude: Vec<String>,
    /// Bundle in production mode.
    #[serde(default)]
    pub obfuscate: bool,
    /// Module source root relative to the workspace.
    #[serde(default = "default_dir")]
    pub dir: Utf8PathBuf,
}

impl BundleModule {
    /// Start a bundle module description with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, srcs: &[&str]) -> Self {
        Self {
            name: name.into(),
            srcs: srcs.iter().map(|s| (*s).to_owned()).collect(),
            srcs_exclude: Vec::new(),
            obfuscate: false,
            dir: default_dir(),
        }
    }
}
