use super::*;
use crate::ast::ModuleDescriptor;
use rstest::rstest;

const BOODJS: &str = r#"
modgraph_version: "1.0.0"
modules:
  - kind: go_binary
    name: boodjs
    pkg: "."
    testPkg: "."
    srcs: ["main_test.go", "main.go"]
    vendorFirst: true
  - kind: js_bundle
    name: someBood
    srcs: ["foo.js", "bar.js"]
    obfuscate: true
"#;

#[test]
fn parses_both_module_kinds() {
    let manifest = from_str(BOODJS).expect("parse");
    assert_eq!(manifest.modules.len(), 2);
    let Some(ModuleDescriptor::GoBinary(binary)) = manifest.modules.first() else {
        panic!("expected a go_binary first");
    };
    assert_eq!(binary.test_pkg, ".");
    assert!(binary.vendor_first);
    assert_eq!(binary.dir, ".");
    assert!(binary.srcs_exclude.is_empty());
    let Some(ModuleDescriptor::JsBundle(bundle)) = manifest.modules.get(1) else {
        panic!("expected a js_bundle second");
    };
    assert!(bundle.obfuscate);
    assert_eq!(bundle.srcs, vec!["foo.js", "bar.js"]);
}

#[rstest]
#[case::unknown_kind("modgraph_version: \"1.0.0\"\nmodules:\n  - kind: rust_binary\n    name: a\n    srcs: [a]\n")]
#[case::unknown_field("modgraph_version: \"1.0.0\"\nmodules:\n  - kind: js_bundle\n    name: a\n    srcs: [a]\n    minify: true\n")]
#[case::missing_pkg("modgraph_version: \"1.0.0\"\nmodules:\n  - kind: go_binary\n    name: a\n    srcs: [a]\n")]
#[case::missing_version("modules: []\n")]
#[case::bad_yaml("modgraph_version: \"1.0.0\"\nmodules: [\n")]
fn rejects_malformed_manifests(#[case] yaml: &str) {
    let err = from_str(yaml).expect_err("should fail");
    assert!(matches!(err, ManifestError::Parse { .. }), "got {err:?}");
}

#[test]
fn rejects_other_major_versions() {
    let err = from_str("modgraph_version: \"2.0.0\"\nmodules: []\n").expect_err("should fail");
    assert!(matches!(
        err,
        ManifestError::UnsupportedVersion { ref found, .. } if found.major == 2
    ));
}

#[test]
fn from_path_reads_relative_to_parent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = camino::Utf8Path::from_path(dir.path()).expect("utf8 path");
    std::fs::write(root.join("Modfile"), BOODJS).expect("write manifest");
    let manifest = from_path(&root.join("Modfile")).expect("load");
    assert_eq!(manifest.modules.len(), 2);
}

#[test]
fn from_path_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = camino::Utf8Path::from_path(dir.path()).expect("utf8 path");
    let err = from_path(&root.join("Modfile")).expect_err("missing");
    assert!(err.to_string().contains("failed to read manifest"));
}
