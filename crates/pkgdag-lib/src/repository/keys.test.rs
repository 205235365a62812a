use super::*;
use mockito::Server;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_fetch_local_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signing.rsa.pub");
    fs::write(&path, b"key-bytes").unwrap();

    let material = KeyFetcher::default().fetch(path.to_str().unwrap()).unwrap();
    assert_eq!(material.as_deref(), Some(b"key-bytes".as_slice()));
}

#[test]
fn test_fetch_file_uri() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signing.rsa.pub");
    fs::write(&path, b"from-uri").unwrap();

    let identifier = format!("file://{}", path.display());
    let material = KeyFetcher::default().fetch(&identifier).unwrap();
    assert_eq!(material.as_deref(), Some(b"from-uri".as_slice()));
}

#[test]
fn test_missing_local_key_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.rsa.pub");
    assert_eq!(KeyFetcher::default().fetch(path.to_str().unwrap()).unwrap(), None);
    assert_eq!(KeyFetcher::default().fetch("relative/absent.rsa.pub").unwrap(), None);
}

#[test]
fn test_unreadable_local_key_fails() {
    // a directory cannot be read as a file
    let dir = TempDir::new().unwrap();
    let result = KeyFetcher::default().fetch(dir.path().to_str().unwrap());
    assert!(matches!(result, Err(KeyError::ReadFailed { .. })));
}

#[test]
fn test_unsupported_schemes() {
    for key in ["ftp://keys.example.dev/a.pub", "http://keys.example.dev/a.pub"] {
        let result = KeyFetcher::default().fetch(key);
        assert!(
            matches!(result, Err(KeyError::SchemeNotSupported { .. })),
            "{} should be rejected",
            key
        );
    }
}

#[test]
fn test_fetch_url_returns_body() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/keys/signing.rsa.pub")
        .with_status(200)
        .with_body("remote-key")
        .create();

    let url = format!("{}/keys/signing.rsa.pub", server.url());
    let bytes = KeyFetcher::default().fetch_url(&url).unwrap();

    mock.assert();
    assert_eq!(bytes, b"remote-key");
}

#[test]
fn test_fetch_url_error_status() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/keys/gone.pub").with_status(404).create();

    let url = format!("{}/keys/gone.pub", server.url());
    let result = KeyFetcher::default().fetch_url(&url);
    assert!(matches!(result, Err(KeyError::RequestFailed { .. })));
}
