//! Bundle modules: one webpack invocation over the resolved files.

use itertools::Itertools;

use super::{CompileContext, resolve_sources};
use crate::ast::BundleModule;
use crate::plan::{BuildAction, ModuleError};
use crate::rules::RuleId;

pub(super) fn compile(
    ctx: &CompileContext<'_>,
    module: &BundleModule,
) -> Result<Vec<BuildAction>, Vec<ModuleError>> {
    let sources = resolve_sources(
        ctx,
        &module.name,
        &module.dir,
        &module.srcs,
        &module.srcs_exclude,
    )?;
    let inputs = sources.all_paths();
    let rule = if module.obfuscate {
        RuleId::BundleObfuscated
    } else {
        RuleId::Bundle
    };
    let output = ctx.layout.bundle(&module.name);
    let action = BuildAction::new(
        rule,
        output.clone(),
        format!("Bundle JavaScript files {}", module.name),
    )
    .with_arg("workDir", module.dir.as_str())
    .with_arg("input", inputs.iter().join(" "))
    .with_arg("output", output.as_str())
    .with_implicits(inputs);
    Ok(vec![action])
}
