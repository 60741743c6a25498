use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::service::OcrOutcome;

/// Результат распознавания. Carries `success: false` with the reason in
/// `error` when recognition failed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OcrResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Средняя уверенность распознавания, 0–100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResponse {
    pub fn completed(outcome: OcrOutcome, elapsed_ms: u64) -> Self {
        Self {
            success: true,
            text: Some(outcome.text),
            confidence: Some(outcome.confidence),
            processing_time_ms: elapsed_ms,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            confidence: None,
            processing_time_ms: 0,
            error: Some(error.into()),
        }
    }
}

/// Форма для /ocr/process-base64.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Base64OcrForm {
    /// Изображение в base64; допускается data-URL префикс
    pub image: String,
    /// Язык распознавания tesseract
    #[serde(default = "default_language")]
    pub language: String,
}

/// Multipart-форма для /ocr/process, описана для OpenAPI.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct OcrUploadForm {
    /// Изображение или PDF для распознавания
    #[schema(value_type = String, format = Binary)]
    pub file: String,
    /// Язык распознавания tesseract
    pub language: Option<String>,
    /// Идентификатор компании, передаётся транзитом
    pub company_id: Option<i64>,
}

pub fn default_language() -> String {
    "rus+eng".to_string()
}
