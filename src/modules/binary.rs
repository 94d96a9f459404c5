//! Compiled-binary modules: optional vendoring, a build and optional tests.

use super::{CompileContext, module_path, resolve_sources};
use crate::ast::BinaryModule;
use crate::plan::{BuildAction, ModuleError};
use crate::rules::RuleId;

pub(super) fn compile(
    ctx: &CompileContext<'_>,
    module: &BinaryModule,
) -> Result<Vec<BuildAction>, Vec<ModuleError>> {
    let sources = resolve_sources(
        ctx,
        &module.name,
        &module.dir,
        &module.srcs,
        &module.srcs_exclude,
    )?;
    let mut build_inputs = sources.non_test_paths();
    let mut test_inputs = sources.all_paths();
    let work_dir = module.dir.as_str();
    let mut actions = Vec::with_capacity(3);

    if module.vendor_first {
        let vendor = module_path(&module.dir, "vendor");
        actions.push(
            BuildAction::new(
                RuleId::VendorDependencies,
                vendor.clone(),
                format!("Vendor dependencies of {}", module.name),
            )
            .with_implicits([module_path(&module.dir, "go.mod")])
            .with_arg("workDir", work_dir)
            .with_arg("name", module.name.as_str())
            .mark_optional(),
        );
        build_inputs.push(vendor.clone());
        test_inputs.push(vendor);
    }

    let output = ctx.layout.binary(&module.name);
    actions.push(
        BuildAction::new(
            RuleId::Compile,
            output.clone(),
            format!("Build {} as Go binary", module.name),
        )
        .with_implicits(build_inputs)
        .with_arg("workDir", work_dir)
        .with_arg("output", output.as_str())
        .with_arg("pkg", module.pkg.as_str()),
    );

    if module.has_tests() {
        let report = ctx.layout.test_report();
        actions.push(
            BuildAction::new(
                RuleId::RunTests,
                report.clone(),
                format!("Run {} tests", module.name),
            )
            .with_implicits(test_inputs)
            .with_arg("workDir", work_dir)
            .with_arg("pkg", module.test_pkg.as_str())
            .with_arg("testOutput", report.as_str()),
        );
    }
    Ok(actions)
}
