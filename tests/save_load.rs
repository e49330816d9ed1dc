//! Integration test: saving to disk and loading back

mod common;

use docx_parts_engine::opc::RelationshipScope;
use docx_parts_engine::{Engine, EngineOptions, Error, Logger};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_save_and_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("edited.docx");

    let mut engine = common::sample_engine();
    engine.header().add("Saved header").unwrap();
    engine.document().add_paragraph("Saved paragraph").unwrap();
    engine.save(&path).unwrap();

    let mut reopened = Engine::open_with(&path, common::options()).unwrap();
    assert_eq!(
        reopened.header().text("/word/header1.xml").unwrap(),
        "Saved header"
    );
    assert_eq!(
        reopened.document().paragraph_texts().unwrap().last().unwrap(),
        "Saved paragraph"
    );
    assert!(reopened.check_consistency().unwrap().is_empty());
    assert_eq!(reopened.archive().list()[0], "[Content_Types].xml");
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let err = Engine::open(dir.path().join("nope.docx")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_open_garbage() {
    let err = Engine::from_bytes(b"definitely not a zip", common::options()).unwrap_err();
    assert!(matches!(err, Error::CorruptArchive(_)));
}

#[test]
fn test_untouched_parts_survive_roundtrip() {
    let engine = common::sample_engine();
    let bytes = engine.to_bytes().unwrap();
    let reopened = Engine::from_bytes(&bytes, common::options()).unwrap();

    for name in ["word/styles.xml", "word/settings.xml", "word/document.xml"] {
        assert_eq!(
            reopened.archive().read_bytes(name),
            engine.archive().read_bytes(name),
            "{}",
            name
        );
    }
}

#[test]
fn test_blank_engine_roundtrip() {
    let options = EngineOptions::default().with_logger(Logger::silent());
    let mut engine = Engine::blank(options.clone()).unwrap();
    engine.footer().add("Page").unwrap();

    let bytes = engine.to_bytes().unwrap();
    let mut reopened = Engine::from_bytes(&bytes, options).unwrap();

    let root_rels = reopened
        .package_mut()
        .relationships(RelationshipScope::Package)
        .all()
        .unwrap();
    assert_eq!(root_rels.len(), 1);
    assert_eq!(root_rels[0].target, "word/document.xml");
    assert_eq!(reopened.footer().list().unwrap().len(), 1);
}
