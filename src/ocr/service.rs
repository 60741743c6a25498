use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use tempfile::tempdir;

use super::OcrError;

/// Image formats accepted for direct recognition.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Rasterization resolution for PDF pages.
const PDF_RENDER_DPI: &str = "300";

lazy_static! {
    // Tesseract language specs look like `rus`, `eng` or `rus+eng`. The
    // language string lands on a command line, so nothing else passes.
    static ref LANGUAGE_RE: Regex =
        Regex::new(r"^[a-z_]+(\+[a-z_]+)*$").expect("valid language regex");
}

/// Recognized text with the mean word confidence tesseract reported.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutcome {
    pub text: String,
    /// 0–100
    pub confidence: f32,
}

/// Stateless recognition runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcrService;

impl OcrService {
    pub fn new() -> Self {
        Self
    }

    /// Whether a filename extension is accepted at all.
    pub fn supported_extension(extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        extension == "pdf" || IMAGE_EXTENSIONS.contains(&extension.as_str())
    }

    /// Recognize a stored file, dispatching on its extension.
    pub fn process_file(&self, path: &Path, language: &str) -> Result<OcrOutcome, OcrError> {
        validate_language(language)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if extension == "pdf" {
            self.process_pdf(path, language)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            self.process_image(path, language)
        } else {
            Err(OcrError::UnsupportedFormat(format!(".{}", extension)))
        }
    }

    /// Recognize a base64-encoded image. A `data:image/...;base64,` prefix
    /// is tolerated and stripped.
    pub fn process_base64(&self, data: &str, language: &str) -> Result<OcrOutcome, OcrError> {
        validate_language(language)?;
        let payload = match data.split_once(',') {
            Some((_, rest)) => rest,
            None => data,
        };
        let bytes = BASE64.decode(payload.trim())?;

        let temp_dir = tempdir().map_err(OcrError::TempDir)?;
        let image_path = temp_dir.path().join("upload.png");
        fs::write(&image_path, bytes)?;
        self.process_image(&image_path, language)
    }

    fn process_image(&self, path: &Path, language: &str) -> Result<OcrOutcome, OcrError> {
        let text = run_tesseract(path, language, false)?;
        let tsv = run_tesseract(path, language, true)?;
        Ok(OcrOutcome {
            text: text.trim().to_string(),
            confidence: mean_confidence(&tsv),
        })
    }

    /// Rasterize each PDF page and recognize them in order. Pages are joined
    /// with «--- Страница N ---» separators.
    fn process_pdf(&self, path: &Path, language: &str) -> Result<OcrOutcome, OcrError> {
        let temp_dir = tempdir().map_err(OcrError::TempDir)?;
        let prefix = temp_dir.path().join("page");

        let status = Command::new("pdftoppm")
            .arg("-r")
            .arg(PDF_RENDER_DPI)
            .arg("-png")
            .arg(path)
            .arg(&prefix)
            .status()
            .map_err(OcrError::PdftoppmIo)?;
        if !status.success() {
            return Err(OcrError::PdftoppmExit(status.code().unwrap_or(-1)));
        }

        let mut pages: Vec<PathBuf> = fs::read_dir(temp_dir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|e| e == "png").unwrap_or(false))
            .collect();
        pages.sort();

        let mut texts = Vec::with_capacity(pages.len());
        let mut confidences = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let outcome = self.process_image(page, language)?;
            texts.push(format!("--- Страница {} ---\n{}", index + 1, outcome.text));
            confidences.push(outcome.confidence);
        }

        let confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f32>() / confidences.len() as f32
        };
        Ok(OcrOutcome {
            text: texts.join("\n\n"),
            confidence,
        })
    }
}

fn validate_language(language: &str) -> Result<(), OcrError> {
    if LANGUAGE_RE.is_match(language) {
        Ok(())
    } else {
        Err(OcrError::InvalidLanguage(language.to_string()))
    }
}

/// Invoke tesseract with stdout output, in plain text or TSV mode.
fn run_tesseract(path: &Path, language: &str, tsv: bool) -> Result<String, OcrError> {
    let mut command = Command::new("tesseract");
    command.arg(path).arg("stdout").arg("-l").arg(language);
    if tsv {
        command.arg("tsv");
    }

    let output = command.output().map_err(OcrError::TesseractIo)?;
    if !output.status.success() {
        return Err(OcrError::TesseractExit(output.status.code().unwrap_or(-1)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Mean of the `conf` column over word rows in tesseract TSV output.
/// Structural rows carry a confidence of -1 and are skipped.
fn mean_confidence(tsv: &str) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        if let Ok(conf) = fields[10].parse::<f32>() {
            if conf >= 0.0 {
                sum += conf;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allowlist_is_case_insensitive() {
        assert!(OcrService::supported_extension("png"));
        assert!(OcrService::supported_extension("PDF"));
        assert!(OcrService::supported_extension("JPEG"));
        assert!(!OcrService::supported_extension("exe"));
        assert!(!OcrService::supported_extension("docx"));
        assert!(!OcrService::supported_extension(""));
    }

    #[test]
    fn language_codes_are_gated() {
        assert!(validate_language("rus").is_ok());
        assert!(validate_language("rus+eng").is_ok());
        assert!(validate_language("chi_sim+eng").is_ok());
        assert!(validate_language("rus;rm -rf /").is_err());
        assert!(validate_language("RUS").is_err());
        assert!(validate_language("").is_err());
        assert!(validate_language("+rus").is_err());
    }

    #[test]
    fn unsupported_extension_fails_before_any_tooling() {
        let service = OcrService::new();
        let err = service
            .process_file(Path::new("/nonexistent/report.docx"), "rus")
            .unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedFormat(_)));
    }

    #[test]
    fn invalid_base64_fails_before_any_tooling() {
        let service = OcrService::new();
        let err = service.process_base64("%%%not-base64%%%", "rus").unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn data_url_prefix_is_stripped_before_decoding() {
        let service = OcrService::new();
        // The payload after the comma is invalid, so the decode error proves
        // the prefix itself was not fed to the decoder.
        let err = service
            .process_base64("data:image/png;base64,%%%", "rus")
            .unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn mean_confidence_skips_structural_rows() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t30\t12\t90\tпервое\n\
                   5\t1\t1\t1\t1\t2\t50\t10\t30\t12\t80.5\tвторое\n";
        let confidence = mean_confidence(tsv);
        assert!((confidence - 85.25).abs() < 1e-4);
    }

    #[test]
    fn mean_confidence_of_empty_output_is_zero() {
        assert_eq!(mean_confidence(""), 0.0);
        assert_eq!(mean_confidence("header-only\n"), 0.0);
    }
}
