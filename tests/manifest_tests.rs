//! Manifest loading tests against the files in `tests/data`.

use anyhow::{Context, Result, ensure};
use camino::Utf8Path;
use modgraph::ast::ModuleDescriptor;
use modgraph::manifest::{self, ManifestError};
use rstest::rstest;

#[rstest]
#[case("boodjs.yml", &["boodjs", "someBood"])]
#[case("broken_glob.yml", &["boodjs", "web"])]
fn loads_module_names_in_order(#[case] file: &str, #[case] names: &[&str]) -> Result<()> {
    let manifest = manifest::from_path(&Utf8Path::new("tests/data").join(file))?;
    let found: Vec<_> = manifest.modules.iter().map(ModuleDescriptor::name).collect();
    ensure!(found == names, "unexpected modules {found:?}");
    Ok(())
}

#[test]
fn unknown_kind_is_a_structure_error() -> Result<()> {
    let err = manifest::from_path(Utf8Path::new("tests/data/unknown_kind.yml"))
        .err()
        .context("unknown kind should fail")?;
    let manifest_err = err
        .downcast_ref::<ManifestError>()
        .context("error should be a ManifestError")?;
    ensure!(
        matches!(manifest_err, ManifestError::Parse { .. }),
        "unexpected error {manifest_err:?}"
    );
    let detail = format!("{err:?}");
    ensure!(detail.contains("cpp_library"), "detail lacks kind: {detail}");
    Ok(())
}

#[test]
fn dir_defaults_to_workspace_root() -> Result<()> {
    let manifest = manifest::from_path(Utf8Path::new("tests/data/boodjs.yml"))?;
    let first = manifest.modules.first().context("one module")?;
    ensure!(first.dir().as_str() == ".", "unexpected dir {}", first.dir());
    ensure!(first.kind_name() == "go_binary", "unexpected kind");
    Ok(())
}
