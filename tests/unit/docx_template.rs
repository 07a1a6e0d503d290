//! Template round-trips through the .docx codec

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use test_log::test;

use market_closing::document::{
    placeholder, Block, Container, Document, DocxFile, Inline, Paragraph, Run, TextStyle,
};
use market_closing::models::RankedTables;
use market_closing::report::{fill_report, ReportData, ReportStyle};

use crate::common::logging::{init_test_logging, log_test_step};
use crate::common::templates::closing_template;
use crate::common::test_data::{create_test_universe, report_date};

#[test]
fn test_saved_template_reopens_unchanged() {
    init_test_logging();
    log_test_step("Saving and reloading a template");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.docx");

    let template = closing_template(&create_test_universe());
    template.save(&path).unwrap();

    let reopened = DocxFile::open(&path).unwrap();

    assert_eq!(reopened.document().text(), template.document().text());
    assert!(reopened.document().contains("{{MOST ACTIVE STOCK 5}}"));
    assert!(reopened
        .document_xml()
        .unwrap()
        .contains(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#));
}

#[test]
fn test_placeholder_split_by_the_editor_is_replaced() {
    let document = Document::new(vec![Block::Paragraph(Paragraph::new(vec![
        Run::new("Gold {{"),
        Run::new("GC=F"),
        Run::new("}} per ounce"),
    ]))]);
    let docx = DocxFile::from_document(document);
    let mut reopened = DocxFile::from_bytes(&docx.to_bytes().unwrap()).unwrap();
    assert_eq!(reopened.document().paragraphs()[0].runs().count(), 3);

    let style = TextStyle::new("Sitka Display", 8.0);
    assert!(placeholder::replace_first(reopened.document_mut(), "{{GC=F}}", "4 012.30", &style, None));

    assert_eq!(reopened.document().text(), "Gold 4 012.30 per ounce");
    assert_eq!(reopened.document().paragraphs()[0].runs().count(), 3);

    let xml = reopened.document_xml().unwrap();
    assert!(xml.contains(r#"<w:t xml:space="preserve">4 012.30</w:t>"#));
    assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
}

#[test]
fn test_missing_template_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(DocxFile::open(&dir.path().join("absent.docx")).is_err());
}

#[test]
fn test_markers_in_links_and_content_controls_are_filled() {
    init_test_logging();
    log_test_step("Filling a template whose markers sit inside wrappers");

    let mut linked = Paragraph::from_text("Source: ");
    linked.content.push(Inline::Container(Container {
        open: r#"<w:hyperlink w:anchor="top">"#.to_string(),
        content: vec![Inline::Run(Run::new("{{LINKED}}"))],
        close: "</w:hyperlink>".to_string(),
    }));
    let date_control = Block::Container(Container {
        open: r#"<w:sdt><w:sdtPr><w:tag w:val="date"/></w:sdtPr><w:sdtContent>"#.to_string(),
        content: vec![Block::Paragraph(Paragraph::from_text("Closing of {{DATE}}"))],
        close: "</w:sdtContent></w:sdt>".to_string(),
    });

    let template = DocxFile::from_document(Document::new(vec![Block::Paragraph(linked), date_control]));
    let mut docx = DocxFile::from_bytes(&template.to_bytes().unwrap()).unwrap();

    let data = ReportData {
        date: report_date(),
        ranked: RankedTables::default(),
        markets: Vec::new(),
        sectors: Vec::new(),
    };
    let leftovers = fill_report(docx.document_mut(), &data, &ReportStyle::default());

    assert_eq!(leftovers, vec!["{{LINKED}}"]);
    assert_eq!(docx.document().text(), "Source: -\nClosing of January 21st 2026");

    let xml = docx.document_xml().unwrap();
    assert!(!xml.contains("{{"));
    assert!(xml.contains(r#"<w:hyperlink w:anchor="top"><w:r>"#));
    assert!(xml.contains(r#"<w:sdt><w:sdtPr><w:tag w:val="date"/></w:sdtPr><w:sdtContent><w:p>"#));
}
