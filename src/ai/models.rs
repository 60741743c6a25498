use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Запрос на анализ текста документа.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzeTextRequest {
    /// Текст для анализа, минимум 10 символов
    pub text: String,
    /// Тип анализа: full, summary, extract, classify
    #[serde(default = "default_analyze_type")]
    pub analyze_type: String,
}

fn default_analyze_type() -> String {
    "full".to_string()
}

/// Запрос на объяснение договора.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExplainContractRequest {
    /// Текст договора, минимум 50 символов
    pub text: String,
}

/// Запрос на извлечение данных для генерации документа.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExtractForGenerationRequest {
    /// Текст документа, минимум 10 символов
    pub text: String,
    /// Тип документа: invoice, waybill, completion_act
    pub target_type: String,
}

/// Текстовый параметр для /ai/classify и /ai/summarize.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TextQuery {
    pub text: String,
}

/// Результат анализа. Which optional fields are present depends on the
/// analysis kind; absent ones are dropped from the JSON entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AiAnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type_ru: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Извлечённые структурированные данные, как их вернула модель
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub extracted_data: Option<Value>,
    /// Найденные сущности: организации, даты, суммы, ИНН, телефоны
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub entities: Option<Value>,
    /// Уверенность модели, 0–100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiAnalysisResponse {
    pub fn failed(error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            processing_time_ms: elapsed_ms,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Результат объяснения договора.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExplainContractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Результат извлечения данных для генерации.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractForGenerationResponse {
    pub success: bool,
    /// Данные, готовые к подстановке в запрос генерации
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
