//! Integration test: headers and footers wired through every manifest

mod common;

use docx_parts_engine::opc::{rel_types, HEADER};
use docx_parts_engine::xml::RawXmlElement;
use docx_parts_engine::document::extract_paragraph_ids;
use docx_parts_engine::{Engine, Error, HeaderFooterKind, ReferenceKind};
use pretty_assertions::assert_eq;

#[test]
fn test_header_ahead_of_page_settings() {
    let mut engine = common::sample_engine();

    let added = engine.header().add("Conclusion").unwrap();

    // Part
    assert_eq!(added.part.as_str(), "/word/header1.xml");
    assert_eq!(engine.header().text("/word/header1.xml").unwrap(), "Conclusion");
    let part = RawXmlElement::parse(&added.xml).unwrap();
    assert_eq!(part.name, "w:hdr");
    assert_eq!(
        part.attr("mc:Ignorable"),
        Some("w14 w15 w16se w16cid w16 w16cex w16sdtdh wp14")
    );
    let para = part.child("w:p").unwrap();
    assert_eq!(para.attr("w14:paraId"), Some("1A2B3C4E"));

    // Relationship: next id past rId4, target relative to word/
    assert_eq!(added.rel_id, "rId5");
    let headers = engine.relationships().by_type(rel_types::HEADER).unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].target, "header1.xml");

    // Exactly one override
    let ct = engine.content_types().read().unwrap();
    let overrides: Vec<_> = ct
        .overrides()
        .iter()
        .filter(|o| o.part_name.as_str() == "/word/header1.xml")
        .collect();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].content_type, HEADER);

    // Exactly one reference, ahead of the page settings
    assert_eq!(
        engine
            .document()
            .section_reference_ids(HeaderFooterKind::Header)
            .unwrap(),
        vec!["rId5"]
    );
    let root = engine.document().read().unwrap();
    let sect = docx_parts_engine::document::body(&root)
        .unwrap()
        .child("w:sectPr")
        .unwrap();
    let names: Vec<_> = sect.elements().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["w:headerReference", "w:pgSz", "w:pgMar"]);
    assert_eq!(sect.elements().next().unwrap().attr("w:type"), Some("default"));

    assert!(engine.check_consistency().unwrap().is_empty());
}

#[test]
fn test_header_into_empty_section() {
    let mut archive = common::sample_archive();
    let start = common::DOCUMENT.find("<w:sectPr>").unwrap();
    let end = common::DOCUMENT.find("</w:sectPr>").unwrap() + "</w:sectPr>".len();
    let mut document = common::DOCUMENT.to_string();
    document.replace_range(start..end, "<w:sectPr/>");
    archive.write("word/document.xml", document);
    let bytes = archive.to_bytes().unwrap();
    let mut engine = Engine::from_bytes(&bytes, common::options()).unwrap();

    let added = engine.header().add("Conclusion").unwrap();

    let root = engine.document().read().unwrap();
    let sect = docx_parts_engine::document::body(&root)
        .unwrap()
        .child("w:sectPr")
        .unwrap();
    let children: Vec<_> = sect.elements().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "w:headerReference");
    assert_eq!(children[0].attr("w:type"), Some("default"));
    assert_eq!(children[0].attr("r:id"), Some(added.rel_id.as_str()));
    assert!(engine.check_consistency().unwrap().is_empty());
}

#[test]
fn test_body_text_untouched_by_header() {
    let mut engine = common::sample_engine();
    let before = engine.document().paragraph_texts().unwrap();

    engine.header().add("Running head").unwrap();
    engine.footer().add("Page footer").unwrap();

    assert_eq!(engine.document().paragraph_texts().unwrap(), before);
}

#[test]
fn test_headers_and_footers_number_independently() {
    let mut engine = common::sample_engine();

    let h1 = engine.header().add("one").unwrap();
    let f1 = engine.footer().add("foot").unwrap();
    let h2 = engine.header().add_with("two", ReferenceKind::First).unwrap();

    assert_eq!(h1.part.as_str(), "/word/header1.xml");
    assert_eq!(f1.part.as_str(), "/word/footer1.xml");
    assert_eq!(h2.part.as_str(), "/word/header2.xml");
    assert_eq!(
        [h1.rel_id.as_str(), f1.rel_id.as_str(), h2.rel_id.as_str()],
        ["rId5", "rId6", "rId7"]
    );

    let refs = engine
        .document()
        .section_references(HeaderFooterKind::Header)
        .unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[1].kind, ReferenceKind::First);
    assert_eq!(engine.header().list().unwrap(), vec![h1.part, h2.part]);
}

#[test]
fn test_empty_text_still_has_one_run() {
    let mut engine = common::sample_engine();

    let added = engine.footer().add("").unwrap();
    let part = RawXmlElement::parse(&added.xml).unwrap();

    assert_eq!(part.name, "w:ftr");
    let paragraphs: Vec<_> = part.children_named("w:p").collect();
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(paragraphs[0].children_named("w:r").count(), 1);
}

#[test]
fn test_missing_document_fails_before_writing() {
    let mut archive = common::sample_archive();
    archive.remove("word/document.xml");
    let bytes = archive.to_bytes().unwrap();
    let mut engine = Engine::from_bytes(&bytes, common::options()).unwrap();
    let before = engine.archive().clone();

    let err = engine.header().add("x").unwrap_err();

    assert!(matches!(err, Error::MissingPart(_)));
    assert_eq!(engine.archive(), &before);
}

#[test]
fn test_document_without_body_fails_before_writing() {
    let mut archive = common::sample_archive();
    archive.write("word/document.xml", "<w:document/>");
    let bytes = archive.to_bytes().unwrap();
    let mut engine = Engine::from_bytes(&bytes, common::options()).unwrap();
    let before = engine.archive().clone();

    let err = engine.footer().add("x").unwrap_err();

    assert!(matches!(err, Error::MalformedXml(_)));
    assert_eq!(engine.archive(), &before);
}

#[test]
fn test_malformed_content_types_fails_before_writing() {
    let mut archive = common::sample_archive();
    archive.write("[Content_Types].xml", "<Typo/>");
    let bytes = archive.to_bytes().unwrap();
    let mut engine = Engine::from_bytes(&bytes, common::options()).unwrap();
    let before = engine.archive().clone();

    let err = engine.header().add("x").unwrap_err();

    assert!(matches!(err, Error::MalformedXml(_)));
    assert!(!engine.archive().exists("word/header1.xml"));
    assert_eq!(engine.archive(), &before);
}

#[test]
fn test_header_and_footer_get_distinct_para_ids() {
    let mut engine = common::sample_engine();

    let header = engine.header().add("h").unwrap();
    let footer = engine.footer().add("f").unwrap();

    assert_eq!(extract_paragraph_ids(&header.xml), vec!["1A2B3C4E"]);
    assert_eq!(extract_paragraph_ids(&footer.xml), vec!["1A2B3C4F"]);
}

#[test]
fn test_remove_restores_package() {
    let mut engine = common::sample_engine();
    let before_doc = engine.document().read().unwrap();
    let before_rels = engine.relationships().all().unwrap();
    let before_ct = engine.content_types().read().unwrap();

    let added = engine.header().add("Temporary").unwrap();
    engine.header().remove(added.part.as_str()).unwrap();

    assert!(!engine.archive().exists("word/header1.xml"));
    assert_eq!(engine.document().read().unwrap(), before_doc);
    assert_eq!(engine.relationships().all().unwrap(), before_rels);
    assert_eq!(engine.content_types().read().unwrap(), before_ct);
}
