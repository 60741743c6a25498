//! Financial document composition.
//!
//! Turns structured requests into Russian-locale business PDFs: счёт на
//! оплату, товарная накладная and акт выполненных работ. The pipeline is
//! validate, total, number, lay out into a document tree, then render the
//! tree through the Typst CLI and store the PDF atomically.

pub mod common;
pub mod completion_act;
pub mod engine;
pub mod handlers;
pub mod invoice;
pub mod layout;
pub mod numbering;
pub mod party;
pub mod schema;
pub mod service;
pub mod template;
pub mod totals;
pub mod validation;
pub mod waybill;
pub mod words;

pub use schema::{
    CompletionActRequest, DocumentKind, GeneratedDocument, InvoiceRequest, LineItem, PartyInfo,
    WaybillRequest,
};
pub use service::{DocumentService, StoredDocument};
pub use template::{assemble, AssembledDocument, DocumentTemplate};
pub use totals::Totals;
pub use words::amount_in_words;

use thiserror::Error;

/// Errors from the document generation pipeline.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The request failed input validation; nothing was rendered.
    #[error("{0}")]
    Validation(#[from] validation::ValidationErrors),
    /// The rendering backend failed to produce a PDF.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The compiled PDF could not be moved into the output directory.
    #[error("failed to store generated document: {0}")]
    Persist(#[source] std::io::Error),
}

/// Errors raised by the Typst rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temp directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to execute Typst CLI: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst compiler exited with code {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}
