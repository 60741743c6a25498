//! Renderable document tree. Templates assemble one of these; the engine
//! serializes it to Typst and compiles it. Blocks appear in the finished
//! document in exactly the order they were pushed.

/// A complete page-formatted document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    /// Page margin on all four sides, in millimeters.
    pub margin_mm: f32,
    pub blocks: Vec<Block>,
}

/// One ordered block of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Centered bold document title.
    Heading(String),
    /// Body paragraph of inline spans.
    Paragraph(Vec<Span>),
    Table(TableBlock),
    /// Fixed vertical gap, in millimeters.
    Spacer(f32),
}

/// Inline fragment of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    Bold(String),
    /// Forced line break within one paragraph.
    Linebreak,
}

/// Table with an optional bold header row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
    pub style: TableStyle,
}

impl TableBlock {
    pub fn column_count(&self) -> usize {
        self.header
            .as_ref()
            .map(Vec::len)
            .or_else(|| self.rows.first().map(Vec::len))
            .unwrap_or(0)
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub bold: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Visual treatment of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableStyle {
    /// Bordered grid with a shaded header row.
    Grid { font_size_pt: f32 },
    /// No strokes at all, used for signature columns.
    Borderless,
}

impl DocumentTree {
    pub fn new(margin_mm: f32) -> Self {
        Self {
            margin_mm,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.push(Block::Heading(text.into()));
    }

    pub fn paragraph(&mut self, spans: Vec<Span>) {
        self.push(Block::Paragraph(spans));
    }

    /// Plain single-span paragraph.
    pub fn text(&mut self, text: impl Into<String>) {
        self.paragraph(vec![Span::Text(text.into())]);
    }

    /// Paragraph set entirely in bold.
    pub fn bold(&mut self, text: impl Into<String>) {
        self.paragraph(vec![Span::Bold(text.into())]);
    }

    /// Bold label followed by plain text on the same line.
    pub fn labeled(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.paragraph(vec![Span::Bold(label.into()), Span::Text(text.into())]);
    }

    pub fn spacer(&mut self, mm: f32) {
        self.push(Block::Spacer(mm));
    }
}
