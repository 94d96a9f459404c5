//! Build plan: the actions emitted for a set of modules and the errors of
//! the modules that could not be compiled.
//!
//! The plan is backend-agnostic. [`crate::ninja_gen`] turns it into a Ninja
//! file, and it serialises to JSON for inspection.
//!
//! # Examples
//!
//! ```
//! use modgraph::plan::{ActionSink, BuildAction, BuildPlan};
//! use modgraph::rules::RuleId;
//!
//! let action = BuildAction::new(RuleId::Bundle, "out/js/bood/app.js", "Bundle app")
//!     .with_arg("workDir", ".")
//!     .with_arg("input", "app.js")
//!     .with_arg("output", "out/js/bood/app.js");
//! let mut plan = BuildPlan::default();
//! plan.accept("app", vec![action]);
//! assert_eq!(plan.actions().len(), 1);
//! assert!(plan.errors().is_empty());
//! ```

use camino::Utf8PathBuf;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::warn;

use crate::rules::RuleId;

mod errors;
mod planner;

pub use errors::ModuleError;
pub use planner::Planner;

/// Outcome of compiling one module: all of its actions or all of its errors.
pub type ModuleResult = Result<Vec<BuildAction>, Vec<ModuleError>>;

/// One unit of work: a rule bound to concrete outputs and arguments.
///
/// `implicits` only order the graph; they are never passed to the command
/// positionally. Actions are not mutated once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildAction {
    /// Rule the action instantiates.
    pub rule: RuleId,
    /// Files the action produces. Never empty.
    pub outputs: Vec<Utf8PathBuf>,
    /// Files that must be up to date before the action runs.
    pub implicits: Vec<Utf8PathBuf>,
    /// Values bound to the rule's placeholders, in binding order.
    pub arguments: IndexMap<String, String>,
    /// Human-readable summary for logs.
    pub description: String,
    /// Excluded from the default target set.
    pub optional: bool,
}

impl BuildAction {
    /// Start an action producing `output` with `rule`.
    #[must_use]
    pub fn new(
        rule: RuleId,
        output: impl Into<Utf8PathBuf>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            outputs: vec![output.into()],
            implicits: Vec::new(),
            arguments: IndexMap::new(),
            description: description.into(),
            optional: false,
        }
    }

    /// Append ordering-only dependencies.
    #[must_use]
    pub fn with_implicits(mut self, paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        self.implicits.extend(paths);
        self
    }

    /// Bind `value` to the placeholder `key`.
    #[must_use]
    pub fn with_arg(mut self, key: &str, value: impl Into<String>) -> Self {
        self.arguments.insert(key.to_owned(), value.into());
        self
    }

    /// Exclude the action from the default target set.
    #[must_use]
    pub const fn mark_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Argument bound to `key`, if any.
    #[must_use]
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

/// Receives compiled modules. This is the hand-off point to whatever
/// ingests the graph; implementations are driven from a single thread.
pub trait ActionSink {
    /// Take ownership of every action of `module`.
    fn accept(&mut self, module: &str, actions: Vec<BuildAction>);

    /// Record an error of a module that emitted nothing.
    fn reject(&mut self, error: ModuleError);
}

/// Forward one module's result to `sink`, all or nothing.
pub fn emit(sink: &mut dyn ActionSink, module: &str, result: ModuleResult) {
    match result {
        Ok(actions) => sink.accept(module, actions),
        Err(errors) => {
            for error in errors {
                sink.reject(error);
            }
        }
    }
}

/// Aggregate result of planning a build.
///
/// Callers decide whether any module error is fatal; the actions of
/// unaffected modules are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    actions: Vec<BuildAction>,
    errors: Vec<ModuleError>,
}

impl BuildPlan {
    /// Emitted actions in module order, then emission order.
    #[must_use]
    pub fn actions(&self) -> &[BuildAction] {
        &self.actions
    }

    /// Errors of modules that emitted nothing.
    #[must_use]
    pub fn errors(&self) -> &[ModuleError] {
        &self.errors
    }

    /// Returns `true` when no module failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Actions whose rule is `rule`.
    pub fn actions_for(&self, rule: RuleId) -> impl Iterator<Item = &BuildAction> {
        self.actions.iter().filter(move |a| a.rule == rule)
    }

    /// Outputs produced by more than one action, in first-seen order.
    ///
    /// Tested modules share a single report path, so these are expected
    /// whenever two modules run tests.
    #[must_use]
    pub fn colliding_outputs(&self) -> Vec<Utf8PathBuf> {
        let mut seen = IndexSet::new();
        let mut dups = IndexSet::new();
        for output in self.actions.iter().flat_map(|a| &a.outputs) {
            if !seen.insert(output) {
                dups.insert(output.clone());
            }
        }
        dups.into_iter().collect()
    }

    /// Split into actions and errors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<BuildAction>, Vec<ModuleError>) {
        (self.actions, self.errors)
    }
}

impl ActionSink for BuildPlan {
    fn accept(&mut self, module: &str, actions: Vec<BuildAction>) {
        for action in &actions {
            for output in &action.outputs {
                if self.actions.iter().any(|a| a.outputs.contains(output)) {
                    warn!(
                        module,
                        output = %output,
                        "output already produced by another module; the last writer wins",
                    );
                }
            }
        }
        self.actions.extend(actions);
    }

    fn reject(&mut self, error: ModuleError) {
        self.errors.push(error);
    }
}
