//! `.docx` container support for the document tree.
//!
//! `word/document.xml` and the header and footer parts are interpreted;
//! every other part of the package is copied through byte for byte. Output is deterministic: entries keep
//! their order and carry a fixed timestamp.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{
    Block, Cell, Container, Document, Inline, Paragraph, Row, RowChild, Run, Table, TableChild,
    TextStyle,
};
use crate::error::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

const WORD_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Wrappers around blocks, rows or cells whose content is still document text
const STRUCTURE_WRAPPERS: &[&[u8]] = &[b"sdt", b"customXml"];

/// Wrappers around runs whose content is still paragraph text
const INLINE_WRAPPERS: &[&[u8]] = &[
    b"hyperlink",
    b"smartTag",
    b"sdt",
    b"customXml",
    b"ins",
    b"moveTo",
    b"fldSimple",
    b"dir",
    b"bdo",
];

/// Paragraph property elements that must come after `w:jc`
const AFTER_JC: &[&[u8]] = &[
    b"textDirection",
    b"textAlignment",
    b"textboxTightWrap",
    b"outlineLvl",
    b"divId",
    b"cnfStyle",
    b"rPr",
    b"sectPr",
    b"pPrChange",
];

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    compressed: bool,
    directory: bool,
}

/// Markup around the blocks of one parsed part
#[derive(Debug, Clone)]
struct Story {
    part: String,
    head: String,
    tail: String,
}

impl Story {
    fn to_xml(&self, blocks: &[Block]) -> Result<String, DocumentError> {
        let mut out = String::with_capacity(self.head.len() + self.tail.len() + 4096);
        out.push_str(&self.head);
        write_blocks(&mut out, blocks)?;
        out.push_str(&self.tail);
        Ok(out)
    }
}

fn is_furniture(part: &str) -> bool {
    (part.starts_with("word/header") || part.starts_with("word/footer")) && part.ends_with(".xml")
}

fn part_text(part: &Part) -> Result<&str, DocumentError> {
    std::str::from_utf8(&part.data)
        .map_err(|e| DocumentError::Malformed(format!("{} is not UTF-8: {}", part.name, e)))
}

/// A word processing package with its body, headers and footers parsed into a [`Document`]
#[derive(Debug, Clone)]
pub struct DocxFile {
    parts: Vec<Part>,
    body: Story,
    /// Header and footer parts, in the order of `Document::furniture`
    furniture: Vec<Story>,
    document: Document,
}

impl DocxFile {
    /// Load a template from disk
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_string(),
                compressed: file.compression() != CompressionMethod::Stored,
                directory: file.is_dir(),
                data,
            });
        }

        let part = parts
            .iter()
            .find(|p| p.name == DOCUMENT_PART)
            .ok_or_else(|| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?;
        let (body, blocks) = parse_story(part, &[b"body"])?;
        let mut document = Document::new(blocks);

        let mut furniture = Vec::new();
        for part in parts.iter().filter(|p| is_furniture(&p.name)) {
            let (story, blocks) = parse_story(part, &[b"hdr", b"ftr"])?;
            furniture.push(story);
            document.furniture.push(blocks);
        }

        Ok(Self {
            parts,
            body,
            furniture,
            document,
        })
    }

    /// Minimal package wrapping the body of `document`
    pub fn from_document(document: Document) -> Self {
        let part = |name: &str, data: &[u8]| Part {
            name: name.to_string(),
            data: data.to_vec(),
            compressed: true,
            directory: false,
        };

        Self {
            parts: vec![
                part("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
                part("_rels/.rels", PACKAGE_RELS.as_bytes()),
                part(DOCUMENT_PART, &[]),
            ],
            body: Story {
                part: DOCUMENT_PART.to_string(),
                head: format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}"><w:body>"#,
                    WORD_NAMESPACE
                ),
                tail: "</w:body></w:document>".to_string(),
            },
            furniture: Vec::new(),
            document,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialised `word/document.xml`
    pub fn document_xml(&self) -> Result<String, DocumentError> {
        self.body.to_xml(&self.document.body)
    }

    /// Serialised part, `None` for parts copied through unchanged
    fn part_xml(&self, name: &str) -> Result<Option<String>, DocumentError> {
        if name == self.body.part {
            return self.document_xml().map(Some);
        }
        let story = self
            .furniture
            .iter()
            .zip(&self.document.furniture)
            .find(|(story, _)| story.part == name);
        match story {
            Some((story, blocks)) => story.to_xml(blocks).map(Some),
            None => Ok(None),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for part in &self.parts {
            let method = if part.compressed {
                CompressionMethod::Deflated
            } else {
                CompressionMethod::Stored
            };
            let options = FileOptions::default()
                .compression_method(method)
                .last_modified_time(zip::DateTime::default());

            if part.directory {
                writer.add_directory(part.name.clone(), options)?;
                continue;
            }

            writer.start_file(part.name.clone(), options)?;
            match self.part_xml(&part.name)? {
                Some(xml) => writer.write_all(xml.as_bytes())?,
                None => writer.write_all(&part.data)?,
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes)?;
        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn is(e: &BytesStart, local_name: &[u8]) -> bool {
    e.local_name().as_ref() == local_name
}

fn is_any(e: &BytesStart, local_names: &[&[u8]]) -> bool {
    local_names.contains(&e.local_name().as_ref())
}

fn utf8(bytes: Vec<u8>) -> Result<String, DocumentError> {
    String::from_utf8(bytes).map_err(|e| DocumentError::Malformed(e.to_string()))
}

/// Start tag content, e.g. `w:p w:rsidR="00A1"`
fn raw_tag(e: &BytesStart) -> Result<String, DocumentError> {
    std::str::from_utf8(e)
        .map(str::to_string)
        .map_err(|e| DocumentError::Malformed(e.to_string()))
}

fn event_raw(event: Event) -> Result<String, DocumentError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(event)?;
    utf8(writer.into_inner())
}

/// Markup of the element opened by `start`, up to and including its end tag
fn capture(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String, DocumentError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(start.borrow()))?;

    let mut depth = 1usize;
    while depth > 0 {
        let event = reader.read_event()?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        writer.write_event(event)?;
    }

    utf8(writer.into_inner())
}

fn unexpected_eof() -> DocumentError {
    DocumentError::Malformed("unexpected end of document".to_string())
}

/// Split a part into the markup up to its block container, the blocks, and the rest
fn parse_story(part: &Part, containers: &[&[u8]]) -> Result<(Story, Vec<Block>), DocumentError> {
    let mut reader = Reader::from_str(part_text(part)?);
    let mut head = Writer::new(Vec::new());

    let (container, blocks) = loop {
        match reader.read_event()? {
            Event::Start(e) if is_any(&e, containers) => {
                let name = utf8(e.name().as_ref().to_vec())?;
                head.write_event(Event::Start(e))?;
                break (name, parse_blocks(&mut reader)?);
            }
            Event::Empty(e) if is_any(&e, containers) => {
                let name = utf8(e.name().as_ref().to_vec())?;
                head.write_event(Event::Start(e))?;
                break (name, Vec::new());
            }
            Event::Eof => return Err(DocumentError::MissingPart(format!("content of {}", part.name))),
            event => head.write_event(event)?,
        }
    };

    let mut tail = Writer::new(Vec::new());
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => tail.write_event(event)?,
        }
    }

    let story = Story {
        part: part.name.clone(),
        head: utf8(head.into_inner())?,
        tail: format!("</{}>{}", container, utf8(tail.into_inner())?),
    };
    Ok((story, blocks))
}

type ContentParser<T> = fn(&mut Reader<&[u8]>) -> Result<Vec<T>, DocumentError>;

/// A wrapper element opened by `start`, with `parse_content` reading what it wraps.
///
/// For `w:sdt` the wrapped content is that of `w:sdtContent`; the control's
/// properties are kept verbatim in `open` and `close`.
fn parse_container<T>(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    parse_content: ContentParser<T>,
) -> Result<Container<T>, DocumentError> {
    let name = utf8(start.name().as_ref().to_vec())?;
    let mut open = format!("<{}>", raw_tag(start)?);

    if !is(start, b"sdt") {
        let content = parse_content(reader)?;
        return Ok(Container {
            open,
            content,
            close: format!("</{}>", name),
        });
    }

    let mut content = None;
    let mut close = String::new();
    loop {
        let raw = match reader.read_event()? {
            Event::Start(e) if is(&e, b"sdtContent") && content.is_none() => {
                open.push_str(&format!("<{}>", raw_tag(&e)?));
                content = Some(parse_content(reader)?);
                close.push_str(&format!("</{}>", utf8(e.name().as_ref().to_vec())?));
                continue;
            }
            Event::Start(e) => capture(reader, &e)?,
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof()),
            event => event_raw(event)?,
        };
        if content.is_none() {
            open.push_str(&raw);
        } else {
            close.push_str(&raw);
        }
    }
    close.push_str(&format!("</{}>", name));

    Ok(Container {
        open,
        content: content.unwrap_or_default(),
        close,
    })
}

/// Block content up to and including the end tag of the enclosing element
fn parse_blocks(reader: &mut Reader<&[u8]>) -> Result<Vec<Block>, DocumentError> {
    let mut blocks = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if is(&e, b"p") => {
                blocks.push(Block::Paragraph(parse_paragraph(reader, &e)?));
            }
            Event::Empty(e) if is(&e, b"p") => {
                blocks.push(Block::Paragraph(Paragraph {
                    tag: Some(raw_tag(&e)?),
                    ..Paragraph::default()
                }));
            }
            Event::Start(e) if is(&e, b"tbl") => {
                blocks.push(Block::Table(parse_table(reader, &e)?));
            }
            Event::Start(e) if is_any(&e, STRUCTURE_WRAPPERS) => {
                blocks.push(Block::Container(parse_container(reader, &e, parse_blocks)?));
            }
            Event::Start(e) => blocks.push(Block::Opaque(capture(reader, &e)?)),
            Event::End(_) => return Ok(blocks),
            Event::Eof => return Err(unexpected_eof()),
            event => blocks.push(Block::Opaque(event_raw(event)?)),
        }
    }
}

fn parse_paragraph(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Paragraph, DocumentError> {
    let mut paragraph = Paragraph {
        tag: Some(raw_tag(start)?),
        ..Paragraph::default()
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) if is(&e, b"pPr") => paragraph.properties = Some(capture(reader, &e)?),
            Event::Empty(e) if is(&e, b"pPr") => {
                paragraph.properties = Some(event_raw(Event::Empty(e))?);
            }
            Event::End(_) => return Ok(paragraph),
            Event::Eof => return Err(unexpected_eof()),
            event => paragraph.content.push(parse_inline(reader, event)?),
        }
    }
}

/// Inline content up to and including the end tag of the enclosing wrapper
fn parse_inlines(reader: &mut Reader<&[u8]>) -> Result<Vec<Inline>, DocumentError> {
    let mut content = Vec::new();

    loop {
        match reader.read_event()? {
            Event::End(_) => return Ok(content),
            Event::Eof => return Err(unexpected_eof()),
            event => content.push(parse_inline(reader, event)?),
        }
    }
}

fn parse_inline(reader: &mut Reader<&[u8]>, event: Event) -> Result<Inline, DocumentError> {
    match event {
        Event::Start(e) if is(&e, b"r") => parse_run(&capture(reader, &e)?),
        Event::Start(e) if is_any(&e, INLINE_WRAPPERS) => {
            Ok(Inline::Container(parse_container(reader, &e, parse_inlines)?))
        }
        Event::Start(e) => Ok(Inline::Opaque(capture(reader, &e)?)),
        event => Ok(Inline::Opaque(event_raw(event)?)),
    }
}

/// `w:br` without a type (or a text wrapping one) is a line break within the text
fn is_line_break(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .all(|a| a.key.local_name().as_ref() != b"type" || a.value.as_ref() == b"textWrapping")
}

/// A run holding only text, tabs and line breaks becomes a [`Run`]; anything
/// else (drawings, field characters, page breaks, ...) stays opaque.
fn parse_run(raw: &str) -> Result<Inline, DocumentError> {
    let mut reader = Reader::from_str(raw);
    let start = match reader.read_event()? {
        Event::Start(e) => e,
        _ => return Ok(Inline::Opaque(raw.to_string())),
    };

    let mut run = Run {
        tag: Some(raw_tag(&start)?),
        ..Run::default()
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) if is(&e, b"rPr") => run.properties = Some(capture(&mut reader, &e)?),
            Event::Empty(e) if is(&e, b"rPr") => run.properties = Some(event_raw(Event::Empty(e))?),
            Event::Start(e) if is(&e, b"t") => run.text.push_str(&read_text(&mut reader)?),
            Event::Empty(e) if is(&e, b"t") || is(&e, b"lastRenderedPageBreak") => {}
            Event::Empty(e) if is(&e, b"tab") => run.text.push('\t'),
            Event::Empty(e) if is(&e, b"cr") => run.text.push('\n'),
            Event::Empty(e) if is(&e, b"br") && is_line_break(&e) => run.text.push('\n'),
            Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
            Event::End(_) => return Ok(Inline::Run(run)),
            _ => return Ok(Inline::Opaque(raw.to_string())),
        }
    }
}

/// Unescaped text of a `w:t` element, consuming its end tag
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, DocumentError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&utf8(c.into_inner().into_owned())?),
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_table(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Table, DocumentError> {
    Ok(Table {
        tag: Some(raw_tag(start)?),
        content: parse_table_content(reader)?,
    })
}

fn parse_table_content(reader: &mut Reader<&[u8]>) -> Result<Vec<TableChild>, DocumentError> {
    let mut content = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if is(&e, b"tr") => content.push(TableChild::Row(parse_row(reader, &e)?)),
            Event::Start(e) if is_any(&e, STRUCTURE_WRAPPERS) => {
                content.push(TableChild::Container(parse_container(reader, &e, parse_table_content)?));
            }
            Event::Start(e) => content.push(TableChild::Opaque(capture(reader, &e)?)),
            Event::End(_) => return Ok(content),
            Event::Eof => return Err(unexpected_eof()),
            event => content.push(TableChild::Opaque(event_raw(event)?)),
        }
    }
}

fn parse_row(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Row, DocumentError> {
    Ok(Row {
        tag: Some(raw_tag(start)?),
        content: parse_row_content(reader)?,
    })
}

fn parse_row_content(reader: &mut Reader<&[u8]>) -> Result<Vec<RowChild>, DocumentError> {
    let mut content = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if is(&e, b"tc") => {
                let tag = Some(raw_tag(&e)?);
                let blocks = parse_blocks(reader)?;
                content.push(RowChild::Cell(Cell { tag, blocks }));
            }
            Event::Start(e) if is_any(&e, STRUCTURE_WRAPPERS) => {
                content.push(RowChild::Container(parse_container(reader, &e, parse_row_content)?));
            }
            Event::Start(e) => content.push(RowChild::Opaque(capture(reader, &e)?)),
            Event::End(_) => return Ok(content),
            Event::Eof => return Err(unexpected_eof()),
            event => content.push(RowChild::Opaque(event_raw(event)?)),
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn element_name(tag: &str) -> &str {
    tag.split(|c: char| c.is_ascii_whitespace())
        .next()
        .unwrap_or(tag)
}

fn open(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
}

fn close(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(element_name(tag));
    out.push('>');
}

fn write_container<T>(
    out: &mut String,
    container: &Container<T>,
    write_content: fn(&mut String, &[T]) -> Result<(), DocumentError>,
) -> Result<(), DocumentError> {
    out.push_str(&container.open);
    write_content(out, &container.content)?;
    out.push_str(&container.close);
    Ok(())
}

fn write_blocks(out: &mut String, blocks: &[Block]) -> Result<(), DocumentError> {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(out, paragraph)?,
            Block::Table(table) => write_table(out, table)?,
            Block::Container(container) => write_container(out, container, write_blocks)?,
            Block::Opaque(raw) => out.push_str(raw),
        }
    }
    Ok(())
}

fn write_table(out: &mut String, table: &Table) -> Result<(), DocumentError> {
    let tag = table.tag.as_deref().unwrap_or("w:tbl");
    open(out, tag);
    write_table_content(out, &table.content)?;
    close(out, tag);
    Ok(())
}

fn write_table_content(out: &mut String, content: &[TableChild]) -> Result<(), DocumentError> {
    for child in content {
        match child {
            TableChild::Row(row) => write_row(out, row)?,
            TableChild::Container(container) => write_container(out, container, write_table_content)?,
            TableChild::Opaque(raw) => out.push_str(raw),
        }
    }
    Ok(())
}

fn write_row(out: &mut String, row: &Row) -> Result<(), DocumentError> {
    let tag = row.tag.as_deref().unwrap_or("w:tr");
    open(out, tag);
    write_row_content(out, &row.content)?;
    close(out, tag);
    Ok(())
}

fn write_row_content(out: &mut String, content: &[RowChild]) -> Result<(), DocumentError> {
    for child in content {
        match child {
            RowChild::Cell(cell) => {
                let cell_tag = cell.tag.as_deref().unwrap_or("w:tc");
                open(out, cell_tag);
                write_blocks(out, &cell.blocks)?;
                close(out, cell_tag);
            }
            RowChild::Container(container) => write_container(out, container, write_row_content)?,
            RowChild::Opaque(raw) => out.push_str(raw),
        }
    }
    Ok(())
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) -> Result<(), DocumentError> {
    let tag = paragraph.tag.as_deref().unwrap_or("w:p");
    open(out, tag);

    match (paragraph.properties.as_deref(), paragraph.centered) {
        (properties, true) => out.push_str(&with_centering(properties)?),
        (Some(properties), false) => out.push_str(properties),
        (None, false) => {}
    }

    write_inlines(out, &paragraph.content)?;

    close(out, tag);
    Ok(())
}

fn write_inlines(out: &mut String, content: &[Inline]) -> Result<(), DocumentError> {
    for inline in content {
        match inline {
            Inline::Run(run) => write_run(out, run),
            Inline::Container(container) => write_container(out, container, write_inlines)?,
            Inline::Opaque(raw) => out.push_str(raw),
        }
    }
    Ok(())
}

fn write_run(out: &mut String, run: &Run) {
    let tag = run.tag.as_deref().unwrap_or("w:r");
    open(out, tag);

    match (&run.style, &run.properties) {
        (Some(style), _) => out.push_str(&style_properties(style)),
        (None, Some(properties)) => out.push_str(properties),
        (None, None) => {}
    }

    let mut chunk = String::new();
    for ch in run.text.chars() {
        match ch {
            '\t' => {
                flush_text(out, &mut chunk);
                out.push_str("<w:tab/>");
            }
            '\n' => {
                flush_text(out, &mut chunk);
                out.push_str("<w:br/>");
            }
            _ => chunk.push(ch),
        }
    }
    flush_text(out, &mut chunk);

    close(out, tag);
}

fn flush_text(out: &mut String, chunk: &mut String) {
    if chunk.is_empty() {
        return;
    }
    out.push_str(r#"<w:t xml:space="preserve">"#);
    out.push_str(&escape(chunk.as_str()));
    out.push_str("</w:t>");
    chunk.clear();
}

fn style_properties(style: &TextStyle) -> String {
    let font = escape(style.font.as_str());
    let half_points = (style.size_pt * 2.0).round() as u32;

    let mut out = String::from("<w:rPr>");
    out.push_str(&format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
        font
    ));
    if style.bold {
        out.push_str("<w:b/><w:bCs/>");
    } else {
        out.push_str(r#"<w:b w:val="0"/><w:bCs w:val="0"/>"#);
    }
    if let Some(color) = style.color {
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, color.to_hex()));
    }
    out.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        half_points
    ));
    out.push_str("</w:rPr>");
    out
}

/// Paragraph properties with `w:jc` set to center, keeping schema order
fn with_centering(properties: Option<&str>) -> Result<String, DocumentError> {
    let jc = r#"<w:jc w:val="center"/>"#;

    let Some(properties) = properties else {
        return Ok(format!("<w:pPr>{}</w:pPr>", jc));
    };

    let mut reader = Reader::from_str(properties);
    let (tag, empty) = match reader.read_event()? {
        Event::Start(e) => (raw_tag(&e)?, false),
        Event::Empty(e) => (raw_tag(&e)?, true),
        _ => return Err(DocumentError::Malformed("paragraph properties".to_string())),
    };

    let mut children: Vec<(Vec<u8>, String)> = Vec::new();
    while !empty {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                children.push((name, capture(&mut reader, &e)?));
            }
            Event::Empty(e) => {
                let name = e.local_name().as_ref().to_vec();
                children.push((name, event_raw(Event::Empty(e))?));
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof()),
            event => children.push((Vec::new(), event_raw(event)?)),
        }
    }

    let mut out = String::new();
    open(&mut out, &tag);
    let mut inserted = false;
    for (name, raw) in &children {
        if name.as_slice() == b"jc" {
            continue;
        }
        if !inserted && AFTER_JC.contains(&name.as_slice()) {
            out.push_str(jc);
            inserted = true;
        }
        out.push_str(raw);
    }
    if !inserted {
        out.push_str(jc);
    }
    close(&mut out, &tag);
    Ok(out)
}
