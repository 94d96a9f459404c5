//! Per-module errors collected while planning.
//!
//! None of these cross module boundaries: a failing module contributes its
//! errors to the plan and no actions.

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

use crate::rules::RuleArgumentError;
use crate::sources::SourceError;

/// Why a module emitted no actions.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ModuleError {
    /// A `srcs` or `srcsExclude` pattern failed to resolve.
    #[error("module '{module}': cannot resolve files that match pattern '{pattern}'")]
    #[diagnostic(code(modgraph::module::srcs))]
    SourceResolution {
        /// Module name.
        module: String,
        /// Pattern as written in the manifest.
        pattern: String,
        /// Underlying resolution failure.
        #[source]
        #[diagnostic_source]
        source: SourceError,
    },

    /// The descriptor is malformed.
    #[error("module '{module}': invalid property '{property}': {reason}")]
    #[diagnostic(code(modgraph::module::config))]
    Configuration {
        /// Module name, possibly empty when the name itself is invalid.
        module: String,
        /// Manifest property at fault.
        property: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An action does not bind the arguments its rule expects.
    #[error("module '{module}': {source}")]
    #[diagnostic(code(modgraph::module::rule_binding))]
    RuleBinding {
        /// Module name.
        module: String,
        /// Argument mismatch.
        #[source]
        source: RuleArgumentError,
    },
}

impl ModuleError {
    /// Name of the module the error belongs to.
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            Self::SourceResolution { module, .. }
            | Self::Configuration { module, .. }
            | Self::RuleBinding { module, .. } => module,
        }
    }

    pub(crate) fn configuration(
        module: &str,
        property: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            module: module.to_owned(),
            property: property.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn sources(module: &str, source: SourceError) -> Self {
        Self::SourceResolution {
            module: module.to_owned(),
            pattern: source.pattern().to_owned(),
            source,
        }
    }
}
