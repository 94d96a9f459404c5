//! Ninja file generator.
//!
//! This module converts a [`BuildPlan`] into the textual representation
//! expected by the Ninja build system. Rules are written in catalog order,
//! build statements in emission order, so identical plans always produce
//! identical files.

use crate::plan::{BuildAction, BuildPlan};
use crate::rules::{Rule, RuleCatalog};
use camino::Utf8PathBuf;
use indexmap::IndexSet;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

macro_rules! write_kv {
    ($f:expr, $key:expr, $val:expr) => {
        writeln!($f, "  {} = {}", $key, escape_value($val))?
    };
}

/// Generate a Ninja build file as a string.
///
/// # Examples
///
/// ```
/// use modgraph::ninja_gen::generate;
/// use modgraph::plan::BuildPlan;
/// use modgraph::rules::RuleCatalog;
///
/// assert_eq!(generate(&BuildPlan::default(), &RuleCatalog::standard()), "");
/// ```
#[must_use]
pub fn generate(plan: &BuildPlan, catalog: &RuleCatalog) -> String {
    NinjaFile { plan, catalog }.to_string()
}

/// Escape a path for use in a `build` or `default` line.
fn escape_path(path: &str) -> String {
    path.replace('$', "$$")
        .replace(' ', "$ ")
        .replace(':', "$:")
}

/// Escape a variable value. Placeholders in rule templates are not values
/// and are written verbatim.
fn escape_value(value: &str) -> String {
    value.replace('$', "$$")
}

/// Convert a slice of paths into a space-separated, escaped string.
fn join(paths: &[Utf8PathBuf]) -> String {
    paths.iter().map(|p| escape_path(p.as_str())).join(" ")
}

struct NinjaFile<'a> {
    plan: &'a BuildPlan,
    catalog: &'a RuleCatalog,
}

impl Display for NinjaFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let used: IndexSet<_> = self.plan.actions().iter().map(|a| a.rule).collect();
        for rule in self.catalog.iter().filter(|r| used.contains(&r.id())) {
            write!(f, "{}", DisplayRule(rule))?;
        }
        for action in self.plan.actions() {
            write!(
                f,
                "{}",
                DisplayAction {
                    action,
                    rule: self.catalog.get(action.rule),
                }
            )?;
        }
        let defaults: IndexSet<_> = self
            .plan
            .actions()
            .iter()
            .filter(|a| !a.optional)
            .flat_map(|a| &a.outputs)
            .map(|p| escape_path(p.as_str()))
            .collect();
        if !defaults.is_empty() {
            writeln!(f, "default {}", defaults.iter().join(" "))?;
        }
        Ok(())
    }
}

/// Wrapper struct to display a rule.
struct DisplayRule<'a>(&'a Rule);

impl Display for DisplayRule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "rule {}", self.0.name())?;
        writeln!(f, "  command = {}", self.0.command())?;
        writeln!(f, "  description = {}", self.0.description())?;
        writeln!(f)
    }
}

/// Wrapper struct to display a build statement.
struct DisplayAction<'a> {
    action: &'a BuildAction,
    rule: &'a Rule,
}

impl Display for DisplayAction<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "build {}: {}", join(&self.action.outputs), self.rule.name())?;
        if !self.action.implicits.is_empty() {
            write!(f, " | {}", join(&self.action.implicits))?;
        }
        writeln!(f)?;
        write_kv!(f, "description", &self.action.description);
        for (key, value) in &self.action.arguments {
            write_kv!(f, key, value);
        }
        writeln!(f)
    }
}
