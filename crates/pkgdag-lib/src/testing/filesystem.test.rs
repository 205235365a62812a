use super::*;
use crate::repository::{IndexLoader, KeyRing, RemoteIndexLoader};
use crate::store::PackageStore;
use crate::testing::definition;

#[test]
fn test_written_definitions_load_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = DefinitionDir::new()?;

    let a = definition("a", "1.0", &["b", "so:libfoo"])
        .with_subpackages(["a-dev"])
        .with_provides(["cmd:a=1.0"])
        .with_repositories(["https://repo.example/os"])
        .with_keyring(["/etc/keys/repo.rsa.pub"]);
    let b = Definition::new("b", "2.1", 3);
    dir.write_definition(&a)?;
    dir.write_definition(&b)?;

    let store = PackageStore::load_dir(dir.path())?;
    assert_eq!(store.len(), 2);
    assert_eq!(store.packages()[0].definition.as_ref(), &a);
    assert_eq!(store.packages()[1].definition.as_ref(), &b);
    assert_eq!(store.packages()[1].version, "2.1-r3");

    Ok(())
}

#[test]
fn test_repository_is_readable_by_loader() -> Result<(), Box<dyn std::error::Error>> {
    let dir = DefinitionDir::new()?;
    let index = RepositoryIndex::new("unused", "aarch64").with_entry("zlib", "1.3-r0", &["so:libz"]);

    let uri = dir.write_repository("repo", &index)?;
    assert!(dir.path().join("repo/aarch64").join(INDEX_FILE).is_file());

    let loaded = RemoteIndexLoader::default().load_indexes(&[uri.clone()], &KeyRing::new(), "aarch64")?;
    assert_eq!(loaded[0].source, uri);
    assert_eq!(loaded[0].entries, index.entries);

    Ok(())
}
