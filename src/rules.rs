//! Rule catalog: the fixed command templates build actions refer to.
//!
//! A [`RuleCatalog`] is constructed once and passed by reference into every
//! module compiler. Rules carry no module state; actions bind concrete values
//! to a rule's named `${placeholders}` through their argument map.
//!
//! # Examples
//!
//! ```
//! use modgraph::rules::{RuleCatalog, RuleId};
//!
//! let catalog = RuleCatalog::standard();
//! let rule = catalog.get(RuleId::Compile);
//! assert_eq!(rule.name(), "binaryBuild");
//! assert!(rule.command().contains("${pkg}"));
//! ```

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use indexmap::IndexMap;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Intent a rule serves. Build actions reference rules by this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// Build a binary from a package.
    Compile,
    /// Run a package's tests and capture the report.
    RunTests,
    /// Fetch module dependencies into a vendor directory.
    VendorDependencies,
    /// Bundle sources without minification.
    Bundle,
    /// Bundle sources in production (minified, obfuscated) mode.
    BundleObfuscated,
}

impl RuleId {
    /// Every rule id in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Compile,
        Self::RunTests,
        Self::VendorDependencies,
        Self::Bundle,
        Self::BundleObfuscated,
    ];

    /// Stable identifier used in plans and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::RunTests => "run-tests",
            Self::VendorDependencies => "vendor-dependencies",
            Self::Bundle => "bundle",
            Self::BundleObfuscated => "bundle-obfuscated",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action's arguments do not fit the rule it references.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuleArgumentError {
    /// A mandatory argument was not bound.
    #[error("rule '{rule}' requires argument '{argument}'")]
    #[diagnostic(code(modgraph::rules::missing_argument))]
    Missing {
        /// Rule being bound.
        rule: RuleId,
        /// Name of the unbound argument.
        argument: String,
    },
    /// An argument the rule does not declare.
    #[error("rule '{rule}' does not accept argument '{argument}'")]
    #[diagnostic(code(modgraph::rules::unknown_argument))]
    Unknown {
        /// Rule being bound.
        rule: RuleId,
        /// Name of the unexpected argument.
        argument: String,
    },
}

/// An immutable command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    name: String,
    command: String,
    description: String,
    required: Vec<String>,
    optional: Vec<String>,
}

impl Rule {
    /// Create a rule.
    ///
    /// `name` is the identifier written to the Ninja file; `command` and
    /// `description` may reference arguments as `${name}`.
    #[must_use]
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            command: command.into(),
            description: description.into(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Declare arguments every action must bind.
    #[must_use]
    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required.extend(names.iter().map(|n| (*n).to_owned()));
        self
    }

    /// Declare arguments an action may bind.
    #[must_use]
    pub fn with_optional(mut self, names: &[&str]) -> Self {
        self.optional.extend(names.iter().map(|n| (*n).to_owned()));
        self
    }

    /// Intent this rule serves.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// Ninja rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command template.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Description template shown by the engine while the rule runs.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Mandatory argument names.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Optional argument names.
    #[must_use]
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Names referenced as `${name}` in the command and description.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for template in [self.command.as_str(), self.description.as_str()] {
            for name in placeholders_in(template) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Check `arguments` bind every mandatory name and nothing undeclared.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleArgumentError`] found, missing arguments
    /// before unknown ones.
    pub fn check_arguments(
        &self,
        arguments: &IndexMap<String, String>,
    ) -> Result<(), RuleArgumentError> {
        if let Some(missing) = self.required.iter().find(|n| !arguments.contains_key(*n)) {
            return Err(RuleArgumentError::Missing {
                rule: self.id,
                argument: missing.clone(),
            });
        }
        if let Some(unknown) = arguments
            .keys()
            .find(|k| !self.required.contains(*k) && !self.optional.contains(*k))
        {
            return Err(RuleArgumentError::Unknown {
                rule: self.id,
                argument: unknown.clone(),
            });
        }
        Ok(())
    }
}

fn placeholders_in(template: &str) -> impl Iterator<Item = &str> {
    template.split("${").skip(1).filter_map(|rest| {
        rest.split_once('}')
            .map(|(name, _)| name)
            .filter(|name| !name.is_empty())
    })
}

/// The complete, immutable set of rules for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCatalog {
    compile: Rule,
    run_tests: Rule,
    vendor: Rule,
    bundle: Rule,
    bundle_obfuscated: Rule,
}

impl RuleCatalog {
    /// The Go toolchain and webpack templates.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            compile: Rule::new(
                RuleId::Compile,
                "binaryBuild",
                "cd ${workDir} && go build -o ${output} ${pkg}",
                "build go command ${pkg}",
            )
            .with_required(&["workDir", "output", "pkg"]),
            run_tests: Rule::new(
                RuleId::RunTests,
                "test",
                "cd ${workDir} && go test -v ${pkg} > ${testOutput}",
                "test ${pkg}",
            )
            .with_required(&["workDir", "pkg", "testOutput"]),
            vendor: Rule::new(
                RuleId::VendorDependencies,
                "vendor",
                "cd ${workDir} && go mod vendor",
                "vendor dependencies of ${name}",
            )
            .with_required(&["workDir"])
            .with_optional(&["name"]),
            bundle: Rule::new(
                RuleId::Bundle,
                "bundle",
                "cd ${workDir} && npx webpack --mode=none ${input} -o ${output}",
                "bundle JavaScript files",
            )
            .with_required(&["workDir", "input", "output"]),
            bundle_obfuscated: Rule::new(
                RuleId::BundleObfuscated,
                "obfuscate",
                "cd ${workDir} && npx webpack --mode=production ${input} -o ${output}",
                "bundle JavaScript files with obfuscation",
            )
            .with_required(&["workDir", "input", "output"]),
        }
    }

    /// Replace the rule serving `rule.id()`.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        let id = rule.id();
        *self.slot_mut(id) = rule;
        self
    }

    /// Look up the rule for `id`.
    #[must_use]
    pub const fn get(&self, id: RuleId) -> &Rule {
        match id {
            RuleId::Compile => &self.compile,
            RuleId::RunTests => &self.run_tests,
            RuleId::VendorDependencies => &self.vendor,
            RuleId::Bundle => &self.bundle,
            RuleId::BundleObfuscated => &self.bundle_obfuscated,
        }
    }

    /// Iterate rules in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        RuleId::ALL.into_iter().map(|id| self.get(id))
    }

    const fn slot_mut(&mut self, id: RuleId) -> &mut Rule {
        match id {
            RuleId::Compile => &mut self.compile,
            RuleId::RunTests => &mut self.run_tests,
            RuleId::VendorDependencies => &mut self.vendor,
            RuleId::Bundle => &mut self.bundle,
            RuleId::BundleObfuscated => &mut self.bundle_obfuscated,
        }
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
