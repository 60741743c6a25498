//! Document generation service: assemble a request, render it to PDF and
//! store the file in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::engine::TypstRenderEngine;
use super::schema::{CompletionActRequest, DocumentKind, InvoiceRequest, WaybillRequest};
use super::template::{assemble, DocumentTemplate};
use super::GeneratorError;

/// A rendered document sitting in the output directory.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub filename: String,
    pub path: PathBuf,
    pub total: f64,
}

/// Facade over the composition engine. Carries no state besides the output
/// directory, so one instance serves every worker.
#[derive(Debug, Clone)]
pub struct DocumentService {
    generated_dir: PathBuf,
}

impl DocumentService {
    pub fn new(generated_dir: impl Into<PathBuf>) -> Self {
        Self {
            generated_dir: generated_dir.into(),
        }
    }

    pub fn generate_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<StoredDocument, GeneratorError> {
        self.generate(request)
    }

    pub fn generate_waybill(
        &self,
        request: &WaybillRequest,
    ) -> Result<StoredDocument, GeneratorError> {
        self.generate(request)
    }

    pub fn generate_completion_act(
        &self,
        request: &CompletionActRequest,
    ) -> Result<StoredDocument, GeneratorError> {
        self.generate(request)
    }

    fn generate<T: DocumentTemplate>(
        &self,
        request: &T,
    ) -> Result<StoredDocument, GeneratorError> {
        let assembled = assemble(request)?;
        let pdf = TypstRenderEngine::render(&assembled.tree)?;

        let filename = format!("{}_{}.pdf", assembled.kind.file_stem(), assembled.number);
        let path = self
            .persist(&filename, &pdf)
            .map_err(GeneratorError::Persist)?;

        info!(
            "generated {} ({} bytes) at {}",
            assembled.number,
            pdf.len(),
            path.display()
        );

        Ok(StoredDocument {
            kind: assembled.kind,
            number: assembled.number,
            filename,
            path,
            total: assembled.totals.total,
        })
    }

    /// Write through a same-directory temp file and rename, so a reader of
    /// the output directory never sees a half-written PDF.
    fn persist(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.generated_dir.join(filename);
        let tmp_path = self.generated_dir.join(format!(".{}.tmp", filename));
        fs::write(&tmp_path, bytes)?;
        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
        Ok(path)
    }

    /// Absolute path a stored document would live at.
    pub fn generated_path(&self, filename: &str) -> PathBuf {
        self.generated_dir.join(filename)
    }

    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }
}
