use super::*;
use crate::store::{Definition, PackageStore};

fn origin(name: &str, version: &str, epoch: u64) -> Package {
    let store = PackageStore::from_definitions([Definition::new(name, version, epoch)]).unwrap();
    Package::Origin(store.packages()[0].clone())
}

#[test]
fn test_origin_identity() {
    let pkg = origin("busybox", "1.36.1", 2);
    assert_eq!(pkg.name(), "busybox");
    assert_eq!(pkg.version(), "1.36.1-r2");
    assert_eq!(pkg.source(), LOCAL);
    assert_eq!(pkg.key(), "busybox:1.36.1-r2@local");
    assert_eq!(pkg.to_string(), "busybox-1.36.1-r2");
}

#[test]
fn test_external_identity() {
    let pkg = Package::from(ExternalPackage {
        name: "glibc".to_string(),
        version: "2.38-r1".to_string(),
        repository: "https://packages.example.dev/os".to_string(),
    });
    assert_eq!(pkg.key(), "glibc:2.38-r1@https://packages.example.dev/os");
    assert!(pkg.local().is_none());
}

#[test]
fn test_dangling_has_empty_version_and_source() {
    let pkg = Package::from(DanglingPackage {
        name: "zzz".to_string(),
    });
    assert_eq!(pkg.version(), "");
    assert_eq!(pkg.source(), "");
    assert_eq!(pkg.key(), "zzz:@");
    assert!(pkg.is_dangling());
}

#[test]
fn test_equality_follows_key() {
    assert_eq!(origin("a", "1", 0), origin("a", "1", 0));
    assert_ne!(origin("a", "1", 0), origin("a", "1", 1));

    let external = Package::from(ExternalPackage {
        name: "a".to_string(),
        version: "1-r0".to_string(),
        repository: "https://repo".to_string(),
    });
    assert_ne!(origin("a", "1", 0), external);
}

#[test]
fn test_split_dependency() {
    assert_eq!(split_dependency("openssl"), ("openssl", None));
    assert_eq!(split_dependency("so:libc.so.6=6"), ("so:libc.so.6", Some("6")));
}
