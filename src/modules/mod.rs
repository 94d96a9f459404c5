//! Module compilers: turn one typed descriptor into its build actions.
//!
//! Compilation of a module never fails halfway. Either every action is
//! returned, or every problem found is, and the caller forwards the result
//! to an [`crate::plan::ActionSink`] as a unit.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::ast::ModuleDescriptor;
use crate::layout::OutputLayout;
use crate::plan::{BuildAction, ModuleError, ModuleResult};
use crate::rules::RuleCatalog;
use crate::sources::{ResolvedSources, SourceResolver, is_current_dir};

mod binary;
mod bundle;

/// Shared, read-only inputs of every module compiler.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    /// Rules actions may reference.
    pub catalog: &'a RuleCatalog,
    /// Output path mapping.
    pub layout: &'a OutputLayout,
    /// Glob resolution and test classification.
    pub resolver: SourceResolver<'a>,
}

/// Compile `module` into its actions.
///
/// # Errors
///
/// Returns every configuration, resolution and rule-binding error found for
/// the module. No actions are returned alongside errors.
pub fn compile_module(ctx: &CompileContext<'_>, module: &ModuleDescriptor) -> ModuleResult {
    validate_descriptor(module)?;
    let actions = match module {
        ModuleDescriptor::GoBinary(m) => binary::compile(ctx, m)?,
        ModuleDescriptor::JsBundle(m) => bundle::compile(ctx, m)?,
    };
    check_bindings(ctx.catalog, module.name(), &actions)?;
    debug!(
        module = module.name(),
        kind = module.kind_name(),
        actions = actions.len(),
        "compiled module"
    );
    Ok(actions)
}

/// Validate the properties of a single descriptor.
///
/// # Errors
///
/// Returns all violations: an empty `name`, an empty `pkg` for binaries,
/// an empty `srcs` list, and line breaks in any value written to the
/// Ninja file.
pub fn validate_descriptor(module: &ModuleDescriptor) -> Result<(), Vec<ModuleError>> {
    let name = module.name();
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(ModuleError::configuration(name, "name", "must not be empty"));
    }
    if let ModuleDescriptor::GoBinary(m) = module
        && m.pkg.trim().is_empty()
    {
        errors.push(ModuleError::configuration(name, "pkg", "must not be empty"));
    }
    if module.srcs().is_empty() {
        errors.push(ModuleError::configuration(
            name,
            "srcs",
            "at least one pattern is required",
        ));
    }
    for (property, value) in written_values(module) {
        if value.contains(['\n', '\r']) {
            errors.push(ModuleError::configuration(
                name,
                property,
                "must not contain line breaks",
            ));
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Descriptor values that end up verbatim in the Ninja file.
fn written_values(module: &ModuleDescriptor) -> Vec<(&'static str, &str)> {
    let mut values = vec![("name", module.name()), ("dir", module.dir().as_str())];
    if let ModuleDescriptor::GoBinary(m) = module {
        values.push(("pkg", m.pkg.as_str()));
        values.push(("testPkg", m.test_pkg.as_str()));
    }
    values.extend(module.srcs().iter().map(|p| ("srcs", p.as_str())));
    values.extend(module.srcs_exclude().iter().map(|p| ("srcsExclude", p.as_str())));
    values
}

fn check_bindings(
    catalog: &RuleCatalog,
    module: &str,
    actions: &[BuildAction],
) -> Result<(), Vec<ModuleError>> {
    let errors: Vec<_> = actions
        .iter()
        .filter_map(|action| {
            catalog
                .get(action.rule)
                .check_arguments(&action.arguments)
                .err()
        })
        .map(|source| ModuleError::RuleBinding {
            module: module.to_owned(),
            source,
        })
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn resolve_sources(
    ctx: &CompileContext<'_>,
    module: &str,
    dir: &Utf8Path,
    srcs: &[String],
    excludes: &[String],
) -> Result<ResolvedSources, Vec<ModuleError>> {
    ctx.resolver.resolve(dir, srcs, excludes).map_err(|errors| {
        errors
            .into_iter()
            .map(|err| ModuleError::sources(module, err))
            .collect()
    })
}

/// `name` inside the module directory, without a leading `./`.
fn module_path(dir: &Utf8Path, name: &str) -> Utf8PathBuf {
    if is_current_dir(dir) {
        Utf8PathBuf::from(name)
    } else {
        dir.join(name)
    }
}
