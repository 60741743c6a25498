//! Typst rendering engine.
//!
//! Serializes a document tree to Typst source, compiles it with the `typst`
//! CLI inside a temporary directory and returns the PDF bytes. Everything
//! happens inside the temp dir, so a failed compile leaves no partial
//! artifact anywhere.

use std::fs;
use std::process::Command;

use tempfile::tempdir;
use tempfile::TempDir;

use super::layout::{Block, Cell, DocumentTree, Span, TableBlock, TableStyle};
use super::RenderError;

/// Body font stack. Cyrillic coverage comes first; New Computer Modern ships
/// with Typst itself and is the fallback of last resort.
const FONT_STACK: &str = r#"("DejaVu Sans", "Liberation Sans", "New Computer Modern")"#;

const SOURCE_FILENAME: &str = "document.typ";
const OUTPUT_FILENAME: &str = "document.pdf";

/// Stateless engine for rendering document trees to PDF.
pub struct TypstRenderEngine;

impl TypstRenderEngine {
    /// Render a document tree to PDF bytes.
    pub fn render(tree: &DocumentTree) -> Result<Vec<u8>, RenderError> {
        let source = typst_source(tree);

        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let source_path = temp_dir.path().join(SOURCE_FILENAME);
        fs::write(&source_path, source).map_err(RenderError::WriteTypst)?;

        compile_typst_to_pdf(&temp_dir)
    }
}

/// Compile the Typst source sitting in the temp directory to PDF.
fn compile_typst_to_pdf(temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
    let source_path = temp_dir.path().join(SOURCE_FILENAME);
    let output_path = temp_dir.path().join(OUTPUT_FILENAME);

    let status = Command::new("typst")
        .arg("compile")
        .arg(&source_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(RenderError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(RenderError::TypstExit(code));
    }

    fs::read(&output_path).map_err(RenderError::ReadPdf)
}

/// Escape a string for a double-quoted Typst string literal.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Serialize a document tree to Typst source. Every piece of document data
/// travels inside an escaped string literal, so no markup-mode escaping is
/// ever needed.
pub fn typst_source(tree: &DocumentTree) -> String {
    let mut src = String::new();
    src.push_str(&format!(
        "#set page(paper: \"a4\", margin: {}mm)\n",
        tree.margin_mm
    ));
    src.push_str(&format!(
        "#set text(font: {}, size: 10pt, lang: \"ru\")\n\n",
        FONT_STACK
    ));

    for block in &tree.blocks {
        match block {
            Block::Heading(text) => {
                src.push_str(&format!(
                    "#align(center, text(size: 14pt, weight: \"bold\", \"{}\"))\n",
                    escape_typst_string(text)
                ));
            }
            Block::Paragraph(spans) => {
                if spans.is_empty() {
                    continue;
                }
                let parts: Vec<String> = spans.iter().map(span_expr).collect();
                src.push_str(&format!("#par({})\n", parts.join(" + ")));
            }
            Block::Table(table) => write_table(&mut src, table),
            Block::Spacer(mm) => {
                src.push_str(&format!("#v({}mm)\n", mm));
            }
        }
    }

    src
}

fn span_expr(span: &Span) -> String {
    match span {
        Span::Text(text) => format!("text(\"{}\")", escape_typst_string(text)),
        Span::Bold(text) => format!(
            "text(weight: \"bold\", \"{}\")",
            escape_typst_string(text)
        ),
        Span::Linebreak => "linebreak()".to_string(),
    }
}

fn write_table(src: &mut String, table: &TableBlock) {
    let columns = table.column_count();
    if columns == 0 {
        return;
    }

    match table.style {
        TableStyle::Grid { font_size_pt } => {
            src.push_str(&format!(
                "#table(\n  columns: {},\n  align: center + horizon,\n  stroke: 0.5pt + black,\n  inset: 4pt,\n",
                grid_columns(columns)
            ));
            if let Some(header) = &table.header {
                src.push_str("  table.header(");
                for (index, cell) in header.iter().enumerate() {
                    if index > 0 {
                        src.push_str(", ");
                    }
                    src.push_str(&format!(
                        "table.cell(fill: luma(120), text(fill: white, weight: \"bold\", size: {}pt, \"{}\"))",
                        font_size_pt,
                        escape_typst_string(cell)
                    ));
                }
                src.push_str("),\n");
            }
            write_rows(src, &table.rows, font_size_pt);
            src.push_str(")\n");
        }
        TableStyle::Borderless => {
            let specs = vec!["1fr"; columns].join(", ");
            src.push_str(&format!(
                "#table(\n  columns: ({}),\n  align: center,\n  stroke: none,\n  inset: 6pt,\n",
                specs
            ));
            write_rows(src, &table.rows, 10.0);
            src.push_str(")\n");
        }
    }
}

fn write_rows(src: &mut String, rows: &[Vec<Cell>], font_size_pt: f32) {
    for row in rows {
        src.push_str("  ");
        for (index, cell) in row.iter().enumerate() {
            if index > 0 {
                src.push_str(", ");
            }
            src.push_str(&cell_expr(cell, font_size_pt));
        }
        src.push_str(",\n");
    }
}

fn cell_expr(cell: &Cell, font_size_pt: f32) -> String {
    if cell.bold {
        format!(
            "text(weight: \"bold\", size: {}pt, \"{}\")",
            font_size_pt,
            escape_typst_string(&cell.text)
        )
    } else {
        format!(
            "text(size: {}pt, \"{}\")",
            font_size_pt,
            escape_typst_string(&cell.text)
        )
    }
}

/// Column widths for item tables: the second column holds item names and
/// takes the remaining width, everything else sizes to content.
fn grid_columns(count: usize) -> String {
    let specs: Vec<&str> = (0..count)
        .map(|index| if index == 1 { "1fr" } else { "auto" })
        .collect();
    format!("({})", specs.join(", "))
}
