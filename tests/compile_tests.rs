//! End-to-end planning scenarios over an in-memory source tree.
//!
//! Each test compiles a set of descriptors with the standard rule catalog and
//! default layout, then checks the emitted actions and the rendered Ninja
//! text.

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use modgraph::ast::{BinaryModule, BundleModule, ModuleDescriptor};
use modgraph::layout::OutputLayout;
use modgraph::modules::CompileContext;
use modgraph::ninja_gen;
use modgraph::plan::{BuildPlan, ModuleError, Planner};
use modgraph::rules::{RuleCatalog, RuleId};
use modgraph::sources::{MemoryTree, SourceError, SourceResolver, TestFileConvention};
use rstest::{fixture, rstest};

#[fixture]
fn tree() -> MemoryTree {
    MemoryTree::new([
        "main.go",
        "main_test.go",
        "go.mod",
        "foo.js",
        "bar.js",
        "app.js",
        "app_test.js",
    ])
}

fn plan(tree: &MemoryTree, modules: &[ModuleDescriptor]) -> BuildPlan {
    let catalog = RuleCatalog::standard();
    let layout = OutputLayout::default();
    let convention = TestFileConvention::default();
    let ctx = CompileContext {
        catalog: &catalog,
        layout: &layout,
        resolver: SourceResolver::new(tree, &convention),
    };
    Planner::new(ctx).plan(modules)
}

fn render(plan: &BuildPlan) -> String {
    ninja_gen::generate(plan, &RuleCatalog::standard())
}

fn boodjs(test_pkg: &str, vendor_first: bool) -> ModuleDescriptor {
    let mut module = BinaryModule::new("boodjs", ".", &["main_test.go", "main.go"]);
    module.test_pkg = test_pkg.to_owned();
    module.vendor_first = vendor_first;
    ModuleDescriptor::GoBinary(module)
}

#[rstest]
fn binary_without_test_package(tree: MemoryTree) -> Result<()> {
    let plan = plan(&tree, &[boodjs("", false)]);
    ensure!(plan.is_ok(), "unexpected errors: {:?}", plan.errors());
    ensure!(plan.actions().len() == 1, "expected only the build action");
    let ninja = render(&plan);
    ensure!(
        ninja.contains("build out/bin/bood/boodjs: binaryBuild | main.go\n"),
        "missing build statement in:\n{ninja}"
    );
    ensure!(!ninja.contains("rule test"), "test rule must not be written");
    Ok(())
}

#[rstest]
fn binary_with_test_package(tree: MemoryTree) -> Result<()> {
    let plan = plan(&tree, &[boodjs(".", false)]);
    let rules: Vec<_> = plan.actions().iter().map(|a| a.rule).collect();
    ensure!(
        rules == [RuleId::Compile, RuleId::RunTests],
        "unexpected rules {rules:?}"
    );
    let ninja = render(&plan);
    ensure!(
        ninja.contains("build out/reports/bood/test.txt: test | main_test.go main.go\n"),
        "missing test statement in:\n{ninja}"
    );
    ensure!(
        ninja.ends_with("default out/bin/bood/boodjs out/reports/bood/test.txt\n"),
        "unexpected defaults in:\n{ninja}"
    );
    Ok(())
}

#[rstest]
fn vendor_first_adds_optional_vendor_step(tree: MemoryTree) -> Result<()> {
    let plan = plan(&tree, &[boodjs(".", true)]);
    let vendor = plan
        .actions()
        .first()
        .context("vendor action should come first")?;
    ensure!(vendor.rule == RuleId::VendorDependencies, "got {:?}", vendor.rule);
    ensure!(vendor.optional, "vendor action must be optional");
    let ninja = render(&plan);
    ensure!(
        ninja.contains("build vendor: vendor | go.mod\n"),
        "missing vendor statement in:\n{ninja}"
    );
    ensure!(
        ninja.contains("build out/bin/bood/boodjs: binaryBuild | main.go vendor\n"),
        "build should depend on the vendor directory:\n{ninja}"
    );
    ensure!(
        !ninja.lines().any(|l| l.starts_with("default") && l.contains(" vendor")),
        "vendor output must not be a default target:\n{ninja}"
    );
    Ok(())
}

#[rstest]
#[case(false, "bundle", "--mode=none")]
#[case(true, "obfuscate", "--mode=production")]
fn bundle_modes(
    tree: MemoryTree,
    #[case] obfuscate: bool,
    #[case] rule: &str,
    #[case] mode: &str,
) -> Result<()> {
    let mut module = BundleModule::new("someBood", &["foo.js", "bar.js"]);
    module.obfuscate = obfuscate;
    let plan = plan(&tree, &[ModuleDescriptor::JsBundle(module)]);
    let ninja = render(&plan);
    ensure!(
        ninja.contains(&format!(
            "build out/js/bood/someBood.js: {rule} | foo.js bar.js\n"
        )),
        "missing bundle statement in:\n{ninja}"
    );
    ensure!(ninja.contains("  input = foo.js bar.js\n"), "input list:\n{ninja}");
    ensure!(ninja.contains(mode), "expected {mode} in:\n{ninja}");
    Ok(())
}

#[rstest]
fn bundles_do_not_split_out_test_files(tree: MemoryTree) -> Result<()> {
    let module = BundleModule::new("app", &["app.js", "app_test.js"]);
    let plan = plan(&tree, &[ModuleDescriptor::JsBundle(module)]);
    ensure!(plan.is_ok(), "unexpected errors: {:?}", plan.errors());
    let ninja = render(&plan);
    ensure!(
        ninja.contains("build out/js/bood/app.js: bundle | app.js app_test.js\n"),
        "test-named file missing from implicits:\n{ninja}"
    );
    ensure!(
        ninja.contains("  input = app.js app_test.js\n"),
        "test-named file missing from input:\n{ninja}"
    );
    Ok(())
}

#[rstest]
fn line_break_in_pkg_cannot_add_build_statements(tree: MemoryTree) -> Result<()> {
    let injected = ModuleDescriptor::GoBinary(BinaryModule::new(
        "app",
        ".\nbuild evil: phony",
        &["main.go"],
    ));
    let plan = plan(&tree, &[boodjs("", false), injected]);
    ensure!(
        matches!(
            plan.errors(),
            [ModuleError::Configuration { module, property, .. }]
                if module == "app" && property == "pkg"
        ),
        "unexpected errors {:?}",
        plan.errors()
    );
    let ninja = render(&plan);
    ensure!(!ninja.contains("build evil"), "injected statement in:\n{ninja}");
    Ok(())
}

#[rstest]
fn unresolvable_glob_fails_only_its_module(tree: MemoryTree) -> Result<()> {
    let broken = ModuleDescriptor::JsBundle(BundleModule::new("broken", &["web/*.js"]));
    let plan = plan(&tree, &[boodjs("", false), broken]);
    ensure!(plan.actions().len() == 1, "healthy module keeps its action");
    let [err] = plan.errors() else {
        anyhow::bail!("expected one error, got {:?}", plan.errors());
    };
    ensure!(
        matches!(
            err,
            ModuleError::SourceResolution {
                module,
                pattern,
                source: SourceError::NoMatches { .. },
            } if module == "broken" && pattern == "web/*.js"
        ),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[rstest]
fn duplicate_names_fail_later_declarations(tree: MemoryTree) -> Result<()> {
    let plan = plan(&tree, &[boodjs("", false), boodjs("", false)]);
    ensure!(plan.actions().len() == 1, "first declaration compiles");
    ensure!(
        matches!(
            plan.errors(),
            [ModuleError::Configuration { property, .. }] if property == "name"
        ),
        "unexpected errors {:?}",
        plan.errors()
    );
    Ok(())
}

#[rstest]
fn tested_modules_share_the_report(tree: MemoryTree) -> Result<()> {
    let mut other = BinaryModule::new("other", "./other", &["main.go"]);
    other.test_pkg = "./other".into();
    let plan = plan(&tree, &[boodjs(".", false), ModuleDescriptor::GoBinary(other)]);
    ensure!(plan.actions_for(RuleId::RunTests).count() == 2, "both tests run");
    ensure!(
        plan.colliding_outputs() == [Utf8PathBuf::from("out/reports/bood/test.txt")],
        "collision should be reported"
    );
    Ok(())
}

#[rstest]
fn planning_is_deterministic(tree: MemoryTree) -> Result<()> {
    let modules = [
        boodjs(".", true),
        ModuleDescriptor::JsBundle(BundleModule::new("someBood", &["*.js"])),
    ];
    let first = render(&plan(&tree, &modules));
    let second = render(&plan(&tree, &modules));
    ensure!(first == second, "renders differ");
    Ok(())
}
