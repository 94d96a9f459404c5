//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The manifest file does not exist at the expected path.
    #[error("manifest '{path}' not found")]
    #[diagnostic(
        code(modgraph::runner::manifest_not_found),
        help("Create a Modfile, pass --file, or point -C at the workspace.")
    )]
    ManifestNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },

    /// At least one module could not be compiled.
    #[error("{failed} of {total} modules failed")]
    #[diagnostic(code(modgraph::runner::modules_failed))]
    ModulesFailed {
        /// Modules with errors.
        failed: usize,
        /// Modules in the manifest.
        total: usize,
    },
}
