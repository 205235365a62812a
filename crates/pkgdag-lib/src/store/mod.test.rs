// Tests for the package-definition store

use super::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

fn sample_store() -> PackageStore {
    PackageStore::from_definitions([
        Definition::new("gcc", "13.2.0", 1)
            .with_subpackages(["libstdc++", "libgcc"])
            .with_dependencies(["binutils", "glibc-dev"]),
        Definition::new("binutils", "2.41", 0).with_dependencies(["zlib"]),
        Definition::new("zlib", "1.3", 0).with_provides(["so:libz.so.1=1"]),
        Definition::new("curl", "8.4.0", 0).with_dependencies(["so:libz.so.1"]),
    ])
    .unwrap()
}

const GCC_YAML: &str = r#"
package:
  name: gcc
  version: 13.2.0
  epoch: 1
subpackages:
  - name: libstdc++
environment:
  contents:
    repositories:
      - https://packages.example.dev/os
    keyring:
      - https://packages.example.dev/os/signing.rsa.pub
    packages:
      - binutils
      - glibc-dev
"#;

const ZLIB_YAML: &str = r#"
package:
  name: zlib
  version: "1.3"
  dependencies:
    provides:
      - so:libz.so.1=1
"#;

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_dir_parses_yaml_definitions() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gcc.yaml"), GCC_YAML).unwrap();
    fs::write(dir.path().join("zlib.yml"), ZLIB_YAML).unwrap();
    fs::write(dir.path().join("README.md"), "not a definition").unwrap();

    let store = PackageStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.records().len(), 3);

    let gcc = &store.packages()[0];
    assert_eq!(gcc.name, "gcc");
    assert_eq!(gcc.version, "13.2.0-r1");
    assert_eq!(gcc.repositories(), ["https://packages.example.dev/os"]);
    assert_eq!(gcc.dependencies(), ["binutils", "glibc-dev"]);

    let zlib = &store.packages()[1];
    assert_eq!(zlib.version, "1.3-r0");
    assert_eq!(zlib.provides, ["so:libz.so.1=1"]);
}

#[test]
fn test_load_dir_reports_parse_errors_with_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yaml"), "package: [unterminated").unwrap();

    let err = PackageStore::load_dir(dir.path()).unwrap_err();
    match err {
        StoreError::Parse { path, .. } => assert!(path.ends_with("broken.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_load_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let result = PackageStore::load_dir(&dir.path().join("missing"));
    assert!(matches!(result, Err(StoreError::Read { .. })));
}

#[test]
fn test_duplicate_definition_rejected() {
    let result = PackageStore::from_definitions([
        Definition::new("zlib", "1.3", 0),
        Definition::new("zlib", "1.3", 0),
    ]);
    assert!(matches!(result, Err(StoreError::Duplicate { key }) if key == "zlib:1.3-r0@local"));
}

#[test]
fn test_multiple_versions_allowed() {
    let store = PackageStore::from_definitions([
        Definition::new("zlib", "1.3", 0),
        Definition::new("zlib", "1.3", 1),
    ])
    .unwrap();
    assert_eq!(store.config("zlib", true).len(), 2);
    assert_eq!(store.package_names(), ["zlib"]);
}

#[test]
fn test_empty_name_rejected() {
    let result = PackageStore::from_definitions([Definition::new("", "1.0", 0)]);
    assert!(matches!(result, Err(StoreError::Invalid { .. })));
}

// ============================================================================
// Lookups
// ============================================================================

#[test]
fn test_config_exact_only_matches_origins() {
    let store = sample_store();
    assert!(store.config("libstdc++", true).is_empty());

    let subs = store.config("libstdc++", false);
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].kind, LocalKind::Subpackage);
    assert_eq!(subs[0].version, "13.2.0-r1");
    assert_eq!(subs[0].origin_key(), "gcc:13.2.0-r1@local");
}

#[test]
fn test_config_matches_provides() {
    let store = sample_store();
    let found = store.config("so:libz.so.1", false);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "zlib");
    assert!(store.config("so:libz.so.1", true).is_empty());
}

#[test]
fn test_config_by_key() {
    let store = sample_store();
    let record = store.config_by_key("libgcc:13.2.0-r1@local").unwrap();
    assert_eq!(record.kind, LocalKind::Subpackage);
    assert!(store.config_by_key("libgcc:13.2.0-r1@elsewhere").is_none());
}

#[test]
fn test_package_names_sorted() {
    let store = sample_store();
    assert_eq!(store.package_names(), ["binutils", "curl", "gcc", "zlib"]);
}

// ============================================================================
// Subsets
// ============================================================================

#[test]
fn test_sub_is_transitive_closure() {
    let store = sample_store();
    let sub = store.sub(&["gcc"]).unwrap();
    // glibc-dev is not local, so it is simply skipped
    assert_eq!(sub.package_names(), ["binutils", "gcc", "zlib"]);
}

#[test]
fn test_sub_follows_provides_and_subpackages() {
    let store = sample_store();
    assert_eq!(store.sub(&["curl"]).unwrap().package_names(), ["curl", "zlib"]);
    assert_eq!(
        store.sub(&["libgcc"]).unwrap().package_names(),
        ["binutils", "gcc", "zlib"]
    );
}

#[test]
fn test_sub_unknown_root_fails() {
    let store = sample_store();
    let result = store.sub(&["nope"]);
    assert!(matches!(result, Err(StoreError::PackageNotFound { name }) if name == "nope"));
}

#[test]
fn test_subset_is_exact() {
    let store = sample_store();
    let subset = store.subset(&["gcc", "unknown"]).unwrap();
    assert_eq!(subset.package_names(), ["gcc"]);
    assert_eq!(subset.records().len(), 3);
}

#[test]
fn test_subset_by_keys_selects_single_versions() {
    let store = PackageStore::from_definitions([
        Definition::new("zlib", "1.3", 0),
        Definition::new("zlib", "1.2.13", 2),
        Definition::new("curl", "8.4.0", 0),
    ])
    .unwrap();

    let subset = store
        .subset_by_keys(&["zlib:1.2.13-r2@local", "unknown:1-r0@local"])
        .unwrap();
    assert_eq!(subset.len(), 1);
    assert_eq!(subset.packages()[0].version, "1.2.13-r2");
}

#[test]
fn test_local_repository_lists_every_record() {
    let store = sample_store();
    let index = store.local_repository("aarch64");
    assert_eq!(index.source, LOCAL);
    assert_eq!(index.arch, "aarch64");
    assert_eq!(index.entries.len(), store.records().len());
    assert!(
        index
            .entries
            .iter()
            .any(|entry| entry.name == "libstdc++" && entry.version == "13.2.0-r1")
    );
}
