//! Tests for document sources

use super::*;
use tempfile::tempdir;

#[test]
fn test_directory_source_lists_json_files_sorted() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("2002.json"), "{}").unwrap();
    std::fs::write(dir.path().join("1001.json"), "{}").unwrap();
    std::fs::write(dir.path().join("README.txt"), "not a match").unwrap();
    std::fs::create_dir(dir.path().join("nested.json")).unwrap();

    let source = DirectorySource::new(dir.path());
    let docs = source.documents().unwrap();
    let ids: Vec<&str> = docs.iter().map(SourceDocument::id).collect();
    assert_eq!(ids, vec!["1001", "2002"]);
}

#[test]
fn test_directory_source_missing_dir() {
    let dir = tempdir().unwrap();
    let source = DirectorySource::new(dir.path().join("missing"));
    assert!(matches!(
        source.documents(),
        Err(Error::FileNotFound { .. })
    ));
}

#[test]
fn test_source_document_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("1.json");
    std::fs::write(&path, r#"{"info": {}}"#).unwrap();

    let doc = SourceDocument::from_file("1", &path);
    assert_eq!(doc.load().unwrap(), r#"{"info": {}}"#);
}

#[test]
fn test_source_document_load_missing_file() {
    let dir = tempdir().unwrap();
    let doc = SourceDocument::from_file("gone", dir.path().join("gone.json"));
    let err = doc.load().unwrap_err();
    assert!(matches!(err, Error::DocumentRead { .. }));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_memory_source() {
    let source = MemorySource::new()
        .with_document("a", "{}")
        .with_json("b", &serde_json::json!({"info": {}}));
    assert_eq!(source.len(), 2);

    let docs = source.documents().unwrap();
    assert_eq!(docs[1].id(), "b");
    assert_eq!(docs[1].clone().load().unwrap(), r#"{"info":{}}"#);
}
