use super::*;

fn resolver() -> PackageResolver {
    let upstream = RepositoryIndex::new("https://packages.example.dev/os", "x86_64")
        .with_entry("openssl", "3.1.4-r0", &["so:libssl.so.3=3"])
        .with_entry("openssl", "3.0.12-r2", &[])
        .with_entry("libressl", "3.8.2-r0", &["so:libssl.so.3=3"]);
    let local = RepositoryIndex::new("local", "x86_64")
        .with_entry("openssl", "3.1.4-r0", &[])
        .with_entry("openssl", "3.2.0-r0", &[]);
    PackageResolver::new(vec![Arc::new(upstream), Arc::new(local)])
}

#[test]
fn test_candidates_sorted_highest_first() {
    let candidates = resolver().resolve("openssl").unwrap();
    let versions: Vec<_> = candidates.iter().map(|c| c.version.as_str()).collect();
    assert_eq!(versions, ["3.2.0-r0", "3.1.4-r0", "3.1.4-r0", "3.0.12-r2"]);
    assert_eq!(candidates[0].repository, "local");
}

#[test]
fn test_equal_versions_keep_index_order() {
    let candidates = resolver().resolve("openssl").unwrap();
    assert_eq!(candidates[1].repository, "https://packages.example.dev/os");
    assert_eq!(candidates[2].repository, "local");
}

#[test]
fn test_resolve_by_provide() {
    let candidates = resolver().resolve("so:libssl.so.3").unwrap();
    let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["libressl", "openssl"]);
}

#[test]
fn test_version_pin() {
    let candidates = resolver().resolve("openssl=3.0.12-r2").unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].version, "3.0.12-r2");
}

#[test]
fn test_no_candidates() {
    let result = resolver().resolve("zzz");
    assert!(matches!(result, Err(ResolveError::NoCandidates { dependency }) if dependency == "zzz"));
}

#[test]
fn test_empty_name_rejected() {
    assert!(matches!(
        resolver().resolve("=1.0"),
        Err(ResolveError::InvalidName { .. })
    ));
}

#[test]
fn test_compare_versions() {
    assert_eq!(compare_versions("1.10-r0", "1.9-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.2.3-r1", "1.2.3-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.2.3-r10", "1.2.3-r9"), Ordering::Greater);
    assert_eq!(compare_versions("2.0-r0", "2.0-r0"), Ordering::Equal);
    assert_eq!(compare_versions("1.2-r0", "1.2.1-r0"), Ordering::Less);
    assert_eq!(compare_versions("007", "7"), Ordering::Equal);
    assert_eq!(compare_versions("1.0", "1.rc"), Ordering::Greater);
}

#[test]
fn test_pre_release_sorts_below_release() {
    assert_eq!(compare_versions("1.0_rc1-r0", "1.0-r0"), Ordering::Less);
    assert_eq!(compare_versions("1.0-r0", "1.0_beta2-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.0_rc1-r0", "1.0_beta2-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.0_alpha-r3", "1.0-r0"), Ordering::Less);
    assert_eq!(compare_versions("1.0_p1-r0", "1.0-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.0_p1-r0", "1.0_rc1-r0"), Ordering::Greater);
    assert_eq!(compare_versions("1.1.1w-r0", "1.1.1-r0"), Ordering::Greater);
}

#[test]
fn test_release_candidate_ranked_after_release() {
    let index = RepositoryIndex::new("https://packages.example.dev/os", "x86_64")
        .with_entry("curl", "8.5.0_rc1-r0", &[])
        .with_entry("curl", "8.5.0-r0", &[])
        .with_entry("curl", "8.4.0-r1", &[]);
    let resolver = PackageResolver::new(vec![Arc::new(index)]);

    let versions: Vec<String> = resolver
        .resolve("curl")
        .unwrap()
        .into_iter()
        .map(|c| c.version)
        .collect();
    assert_eq!(versions, ["8.5.0-r0", "8.5.0_rc1-r0", "8.4.0-r1"]);
}
