// Tests for repository index loading

use super::*;
use mockito::Server;
use std::fs;
use tempfile::TempDir;

const INDEX_BODY: &str = r#"{
  "packages": [
    { "name": "glibc", "version": "2.38-r1", "provides": ["so:libc.so.6=6"] },
    { "name": "openssl", "version": "3.1.4-r0" }
  ]
}"#;

fn keyring() -> KeyRing {
    let mut keys = KeyRing::new();
    keys.insert("signing.rsa.pub".to_string(), b"-----BEGIN PUBLIC KEY-----".to_vec());
    keys
}

// ============================================================================
// RemoteIndexLoader
// ============================================================================

#[test]
fn test_load_index_over_http() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/os/x86_64/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(INDEX_BODY)
        .create();

    let uri = format!("{}/os", server.url());
    let loader = RemoteIndexLoader::default();
    let indexes = loader
        .load_indexes(std::slice::from_ref(&uri), &keyring(), "x86_64")
        .unwrap();

    mock.assert();
    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].source, uri);
    assert_eq!(indexes[0].arch, "x86_64");
    assert_eq!(indexes[0].entries.len(), 2);
    assert_eq!(indexes[0].entries[0].provides, ["so:libc.so.6=6"]);
    assert!(indexes[0].entries[1].provides.is_empty());
    assert_eq!(indexes[0].signing_keys, ["signing.rsa.pub"]);
}

#[test]
fn test_http_error_status_fails() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/missing/aarch64/index.json")
        .with_status(404)
        .create();

    let uri = format!("{}/missing", server.url());
    let result = RemoteIndexLoader::default().load_indexes(&[uri], &KeyRing::new(), "aarch64");
    assert!(matches!(result, Err(IndexError::RequestFailed { .. })));
}

#[test]
fn test_load_index_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("x86_64")).unwrap();
    fs::write(dir.path().join("x86_64").join(INDEX_FILE), INDEX_BODY).unwrap();

    let uri = dir.path().to_string_lossy().to_string();
    let indexes = RemoteIndexLoader::default()
        .load_indexes(std::slice::from_ref(&uri), &KeyRing::new(), "x86_64")
        .unwrap();
    assert_eq!(indexes[0].source, uri);
    assert_eq!(indexes[0].entries[1].name, "openssl");

    let file_uri = format!("file://{}", uri);
    let indexes = RemoteIndexLoader::default()
        .load_indexes(&[file_uri], &KeyRing::new(), "x86_64")
        .unwrap();
    assert_eq!(indexes[0].entries.len(), 2);
}

#[test]
fn test_malformed_index_fails() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("x86_64")).unwrap();
    fs::write(dir.path().join("x86_64").join(INDEX_FILE), "{ not json").unwrap();

    let uri = dir.path().to_string_lossy().to_string();
    let result = RemoteIndexLoader::default().load_indexes(&[uri], &KeyRing::new(), "x86_64");
    assert!(matches!(result, Err(IndexError::ParseFailed { .. })));
}

#[test]
fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let uri = dir.path().join("nope").to_string_lossy().to_string();
    let result = RemoteIndexLoader::default().load_indexes(&[uri], &KeyRing::new(), "x86_64");
    assert!(matches!(result, Err(IndexError::ReadFailed { .. })));
}

// ============================================================================
// MockIndexLoader
// ============================================================================

#[test]
fn test_mock_loader_serves_registered_indexes() {
    let loader = MockIndexLoader::new()
        .with_index(RepositoryIndex::new("https://repo.one", "").with_entry("a", "1-r0", &[]));

    let indexes = loader
        .load_indexes(&["https://repo.one".to_string()], &keyring(), "riscv64")
        .unwrap();
    assert_eq!(indexes[0].arch, "riscv64");
    assert_eq!(indexes[0].signing_keys, ["signing.rsa.pub"]);
    assert_eq!(loader.calls(), [vec!["https://repo.one".to_string()]]);
}

#[test]
fn test_mock_loader_unknown_repository() {
    let loader = MockIndexLoader::new();
    let result = loader.load_indexes(&["https://gone".to_string()], &KeyRing::new(), "x86_64");
    assert!(matches!(result, Err(IndexError::NotAvailable { uri }) if uri == "https://gone"));
}
