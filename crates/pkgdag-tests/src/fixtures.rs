//! Fixture infrastructure for E2E tests
//!
//! A small base system in definition form, plus helpers for repository
//! index documents and ordering assertions.

use pkgdag_lib::package::{LOCAL, package_key};
use pkgdag_lib::store::Definition;
use pkgdag_lib::testing::definition;
use serde_json::json;

/// Key of a local package at `version`, epoch 0
pub fn local(name: &str, version: &str) -> String {
    package_key(name, &format!("{version}-r0"), LOCAL)
}

/// Key of an external package served by `repository`
pub fn external(name: &str, version: &str, repository: &str) -> String {
    package_key(name, version, repository)
}

/// Base system:
///
/// ```text
/// busybox -> glibc
/// zlib    -> glibc            (provides so:libz.so.1)
/// openssl -> glibc            (subpackage libcrypto3)
/// curl    -> libcrypto3, so:libz.so.1
/// ```
pub fn base_system() -> Vec<Definition> {
    vec![
        definition("busybox", "1.36.1", &["glibc"]),
        definition("curl", "8.4.0", &["libcrypto3", "so:libz.so.1"]),
        definition("glibc", "2.38", &[]),
        definition("openssl", "3.1.4", &["glibc"]).with_subpackages(["libcrypto3"]),
        definition("zlib", "1.3", &["glibc"]).with_provides(["so:libz.so.1=1"]),
    ]
}

/// Index document body as served over HTTP
pub fn index_body(entries: &[(&str, &str)]) -> String {
    let packages: Vec<_> = entries
        .iter()
        .map(|(name, version)| json!({ "name": name, "version": version }))
        .collect();
    json!({ "packages": packages }).to_string()
}

/// Assert `first` appears before `second` in `order`
pub fn assert_precedes(order: &[String], first: &str, second: &str) {
    let position = |key: &str| {
        order
            .iter()
            .position(|k| k == key)
            .unwrap_or_else(|| panic!("{key} missing from {order:?}"))
    };
    assert!(
        position(first) < position(second),
        "expected {first} before {second} in {order:?}"
    );
}
