//! In-memory document tree: paragraphs and tables made of styled runs.
//!
//! The tree is what placeholder substitution operates on. Markup the report
//! never touches (section settings, drawings, table properties, ...) is kept
//! as opaque fragments so a loaded template round-trips unchanged.

use std::ops::ControlFlow;

pub mod docx;
pub mod placeholder;

pub use docx::DocxFile;

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without `#`, e.g. `00B050`
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Character formatting applied to runs written by the report
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub size_pt: f32,
    pub bold: bool,
    pub color: Option<Rgb>,
}

impl TextStyle {
    pub fn new(font: &str, size_pt: f32) -> Self {
        Self {
            font: font.to_string(),
            size_pt,
            bold: false,
            color: None,
        }
    }

    pub fn with_color(&self, color: Option<Rgb>) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// A wrapper element whose content still takes part in substitution:
/// content controls, custom XML, hyperlinks, smart tags, tracked insertions.
///
/// `open` and `close` hold the wrapper markup verbatim, including any
/// properties that precede the content.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<T> {
    pub open: String,
    pub content: Vec<T>,
    pub close: String,
}

/// A fragment of text sharing one formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// Start tag as found in the source markup
    pub tag: Option<String>,
    /// Source formatting markup, used when `style` is not set
    pub properties: Option<String>,
    pub style: Option<TextStyle>,
    pub text: String,
}

impl Run {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn styled(text: &str, style: TextStyle) -> Self {
        Self {
            text: text.to_string(),
            style: Some(style),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(Run),
    Container(Container<Inline>),
    /// Content that is not plain text (fields, drawings, bookmarks, ...)
    Opaque(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub tag: Option<String>,
    pub properties: Option<String>,
    /// Forces centred justification over whatever `properties` says
    pub centered: bool,
    pub content: Vec<Inline>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            content: runs.into_iter().map(Inline::Run).collect(),
            ..Self::default()
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(vec![Run::new(text)])
    }

    /// Runs in reading order, including those inside wrappers
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        let mut out = Vec::new();
        collect_runs(&self.content, &mut out);
        out.into_iter()
    }

    /// Concatenated text of every run
    pub fn text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }
}

fn collect_runs<'a>(content: &'a [Inline], out: &mut Vec<&'a Run>) {
    for inline in content {
        match inline {
            Inline::Run(run) => out.push(run),
            Inline::Container(container) => collect_runs(&container.content, out),
            Inline::Opaque(_) => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub tag: Option<String>,
    pub blocks: Vec<Block>,
}

impl Cell {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { tag: None, blocks }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(vec![Block::Paragraph(Paragraph::from_text(text))])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowChild {
    Cell(Cell),
    Container(Container<RowChild>),
    Opaque(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub tag: Option<String>,
    pub content: Vec<RowChild>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            tag: None,
            content: cells.into_iter().map(RowChild::Cell).collect(),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        let mut out = Vec::new();
        collect_cells(&self.content, &mut out);
        out.into_iter()
    }
}

fn collect_cells<'a>(content: &'a [RowChild], out: &mut Vec<&'a Cell>) {
    for child in content {
        match child {
            RowChild::Cell(cell) => out.push(cell),
            RowChild::Container(container) => collect_cells(&container.content, out),
            RowChild::Opaque(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChild {
    Row(Row),
    Container(Container<TableChild>),
    Opaque(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub tag: Option<String>,
    pub content: Vec<TableChild>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            tag: None,
            content: rows.into_iter().map(TableChild::Row).collect(),
        }
    }

    /// Table whose cells each hold one paragraph of text
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|cells| Row::new(cells.iter().map(|text| Cell::from_text(text)).collect()))
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        let mut out = Vec::new();
        collect_rows(&self.content, &mut out);
        out.into_iter()
    }
}

fn collect_rows<'a>(content: &'a [TableChild], out: &mut Vec<&'a Row>) {
    for child in content {
        match child {
            TableChild::Row(row) => out.push(row),
            TableChild::Container(container) => collect_rows(&container.content, out),
            TableChild::Opaque(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Container(Container<Block>),
    Opaque(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub body: Vec<Block>,
    /// Header and footer stories, visited after the body
    pub furniture: Vec<Vec<Block>>,
}

impl Document {
    pub fn new(body: Vec<Block>) -> Self {
        Self {
            body,
            furniture: Vec::new(),
        }
    }

    /// Every paragraph in document order, descending into tables and wrappers
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(&self.body, &mut out);
        for story in &self.furniture {
            collect_paragraphs(story, &mut out);
        }
        out
    }

    /// Visit paragraphs in document order until `visit` breaks
    pub fn visit_paragraphs_mut<F>(&mut self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&mut Paragraph) -> ControlFlow<()>,
    {
        visit_blocks_mut(&mut self.body, &mut visit)?;
        for story in &mut self.furniture {
            visit_blocks_mut(story, &mut visit)?;
        }
        ControlFlow::Continue(())
    }

    /// Paragraph texts joined by newlines
    pub fn text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.paragraphs().iter().any(|p| p.text().contains(needle))
    }
}

fn collect_paragraphs<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => out.push(paragraph),
            Block::Table(table) => {
                for row in table.rows() {
                    for cell in row.cells() {
                        collect_paragraphs(&cell.blocks, out);
                    }
                }
            }
            Block::Container(container) => collect_paragraphs(&container.content, out),
            Block::Opaque(_) => {}
        }
    }
}

fn visit_blocks_mut<F>(blocks: &mut [Block], visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(&mut Paragraph) -> ControlFlow<()>,
{
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => visit(paragraph)?,
            Block::Table(table) => visit_table_mut(&mut table.content, visit)?,
            Block::Container(container) => visit_blocks_mut(&mut container.content, visit)?,
            Block::Opaque(_) => {}
        }
    }
    ControlFlow::Continue(())
}

fn visit_table_mut<F>(children: &mut [TableChild], visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(&mut Paragraph) -> ControlFlow<()>,
{
    for child in children {
        match child {
            TableChild::Row(row) => visit_row_mut(&mut row.content, visit)?,
            TableChild::Container(container) => visit_table_mut(&mut container.content, visit)?,
            TableChild::Opaque(_) => {}
        }
    }
    ControlFlow::Continue(())
}

fn visit_row_mut<F>(children: &mut [RowChild], visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(&mut Paragraph) -> ControlFlow<()>,
{
    for child in children {
        match child {
            RowChild::Cell(cell) => visit_blocks_mut(&mut cell.blocks, visit)?,
            RowChild::Container(container) => visit_row_mut(&mut container.content, visit)?,
            RowChild::Opaque(_) => {}
        }
    }
    ControlFlow::Continue(())
}
