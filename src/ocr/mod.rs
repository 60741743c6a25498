//! Text recognition for uploaded images and PDF scans.
//!
//! Recognition runs through the `tesseract` CLI; PDFs are rasterized page
//! by page with `pdftoppm` first. Both tools work inside temp directories
//! and stream their results back over stdout.

pub mod handlers;
pub mod models;
pub mod service;

pub use models::OcrResponse;
pub use service::{OcrOutcome, OcrService};

use thiserror::Error;

/// Errors from the recognition pipeline.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Неподдерживаемый формат файла: {0}")]
    UnsupportedFormat(String),
    #[error("Недопустимый код языка распознавания: {0}")]
    InvalidLanguage(String),
    #[error("Некорректные base64 данные: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("failed to create temp directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to execute tesseract: {0}")]
    TesseractIo(#[source] std::io::Error),
    #[error("tesseract exited with code {0}")]
    TesseractExit(i32),
    #[error("failed to execute pdftoppm: {0}")]
    PdftoppmIo(#[source] std::io::Error),
    #[error("pdftoppm exited with code {0}")]
    PdftoppmExit(i32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
