use std::sync::Arc;
use std::time::Instant;

use log::warn;
use serde_json::Value;

use crate::config::AppConfig;
use crate::documents::DocumentKind;

use super::client::{ChatCompletion, ChatModel, ChatRequest, OpenAiChat};
use super::models::{AiAnalysisResponse, ExplainContractResponse, ExtractForGenerationResponse};
use super::AiError;

const FULL_SYSTEM: &str = "\
Ты - эксперт по анализу российских бухгалтерских и юридических документов.
Проанализируй текст документа и верни структурированную информацию в формате JSON.

Определи:
1. Тип документа (счёт, накладная, акт, договор, счёт-фактура и т.д.)
2. Извлеки ключевую информацию (номер, дата, стороны, суммы)
3. Найди все упомянутые сущности (организации, даты, суммы, ИНН, телефоны)
4. Создай краткое резюме документа";

const FULL_FORMAT: &str = r#"Формат ответа:
{
  "document_type": "тип документа",
  "document_type_ru": "тип на русском",
  "summary": "краткое описание (2-3 предложения)",
  "extracted_data": {
    "document_number": "номер",
    "document_date": "дата в формате YYYY-MM-DD",
    "total_amount": числовое значение суммы или null,
    "currency": "валюта",
    "seller": {"name": "", "inn": "", "address": ""},
    "buyer": {"name": "", "inn": "", "address": ""},
    "items": [{"name": "", "quantity": 0, "price": 0, "total": 0}]
  },
  "entities": {
    "organizations": ["список организаций"],
    "dates": ["список дат"],
    "amounts": [{"value": 0, "currency": "RUB"}],
    "inn_numbers": ["список ИНН"],
    "phones": ["список телефонов"],
    "emails": ["список email"]
  },
  "confidence": число от 0 до 100
}"#;

const CLASSIFY_FORMAT: &str = r#"Верни JSON:
{
  "document_type": "тип на английском (invoice, waybill, completion_act, contract, bill, receipt, unknown)",
  "document_type_ru": "тип на русском",
  "confidence": число от 0 до 100,
  "reasoning": "краткое объяснение"
}"#;

const EXTRACT_FORMAT: &str = r#"Верни JSON:
{
  "document_number": "номер документа",
  "document_date": "дата в формате YYYY-MM-DD",
  "total_amount": числовое значение,
  "currency": "валюта",
  "seller": {
    "name": "название",
    "inn": "ИНН",
    "kpp": "КПП",
    "address": "адрес",
    "bank_name": "банк",
    "bank_account": "счёт"
  },
  "buyer": {
    "name": "название",
    "inn": "ИНН",
    "address": "адрес"
  },
  "items": [
    {
      "name": "наименование",
      "quantity": число,
      "unit": "единица",
      "price": число,
      "total": число
    }
  ]
}"#;

const EXPLAIN_SYSTEM: &str = "\
Ты - юрист, который объясняет договоры простым языком.
Проанализируй договор и объясни его содержание понятным деловым языком.
Выдели ключевые моменты, риски и важные условия.";

const EXPLAIN_STRUCTURE: &str = "\
Структура ответа:
1. **Предмет договора** - о чём договор
2. **Стороны** - кто участвует
3. **Основные условия** - ключевые пункты
4. **Сроки** - важные даты и сроки
5. **Финансы** - суммы, порядок оплаты
6. **Ответственность сторон** - что будет при нарушении
7. **Риски и важные моменты** - на что обратить внимание
8. **Необычные условия** - если есть что-то нестандартное";

const GENERATION_FIELDS: &str = "\
Верни JSON с полями:
- seller/executor (название, ИНН, КПП, адрес, банк, счёт, директор)
- buyer/customer (название, ИНН, адрес)
- items (наименование, количество, единица, цена)
- date (дата документа)
- contract_number, contract_date (если есть)";

/// Kind of analysis requested through /ai/analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeKind {
    Full,
    Summary,
    Extract,
    Classify,
}

impl AnalyzeKind {
    /// Parse the wire value; `None` for anything outside the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "full" => Some(Self::Full),
            "summary" => Some(Self::Summary),
            "extract" => Some(Self::Extract),
            "classify" => Some(Self::Classify),
            _ => None,
        }
    }
}

/// Analysis facade. Built without a model when no API key is configured, in
/// which case every operation reports the missing configuration instead of
/// refusing to start the service.
#[derive(Clone)]
pub struct AiAnalyzer {
    model: Option<Arc<dyn ChatModel>>,
}

impl AiAnalyzer {
    pub fn from_config(client: reqwest::Client, config: &AppConfig) -> Self {
        if config.openai_configured() {
            Self {
                model: Some(Arc::new(OpenAiChat::new(
                    client,
                    config.openai_api_key.clone(),
                    config.openai_base_url.clone(),
                    config.openai_model.clone(),
                ))),
            }
        } else {
            Self { model: None }
        }
    }

    /// Analyzer over an explicit model implementation.
    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    fn model(&self) -> Result<&dyn ChatModel, AiError> {
        self.model.as_deref().ok_or(AiError::NotConfigured)
    }

    /// Run one analysis operation, folding any failure into the envelope.
    pub async fn analyze(&self, text: &str, kind: AnalyzeKind) -> AiAnalysisResponse {
        let started = Instant::now();
        let result = match kind {
            AnalyzeKind::Full => self.full_analysis(text).await,
            AnalyzeKind::Summary => self.summarize(text).await,
            AnalyzeKind::Extract => self.extract_data(text).await,
            AnalyzeKind::Classify => self.classify(text).await,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(mut response) => {
                response.success = true;
                response.processing_time_ms = elapsed_ms;
                response
            }
            Err(error) => {
                warn!("document analysis failed: {}", error);
                AiAnalysisResponse::failed(error.to_string(), elapsed_ms)
            }
        }
    }

    async fn full_analysis(&self, text: &str) -> Result<AiAnalysisResponse, AiError> {
        let completion = self
            .model()?
            .complete(ChatRequest {
                system: FULL_SYSTEM.to_string(),
                user: format!(
                    "Проанализируй документ и верни JSON:\n\n{}\n\n{}",
                    truncate_chars(text, 4000),
                    FULL_FORMAT
                ),
                temperature: 0.1,
                max_tokens: None,
                json_mode: true,
            })
            .await?;

        let value: Value = serde_json::from_str(&completion.content)?;
        Ok(AiAnalysisResponse {
            document_type: string_field(&value, "document_type"),
            document_type_ru: string_field(&value, "document_type_ru"),
            summary: string_field(&value, "summary"),
            extracted_data: object_field(&value, "extracted_data"),
            entities: object_field(&value, "entities"),
            confidence: number_field(&value, "confidence"),
            tokens_used: Some(completion.tokens_used),
            ..AiAnalysisResponse::default()
        })
    }

    async fn summarize(&self, text: &str) -> Result<AiAnalysisResponse, AiError> {
        let completion = self
            .model()?
            .complete(ChatRequest {
                system: "Ты - эксперт по анализу документов. Создай краткое резюме документа \
                         на русском языке (3-5 предложений)."
                    .to_string(),
                user: format!(
                    "Создай краткое резюме документа:\n\n{}",
                    truncate_chars(text, 3000)
                ),
                temperature: 0.3,
                max_tokens: Some(500),
                json_mode: false,
            })
            .await?;

        Ok(AiAnalysisResponse {
            summary: Some(completion.content),
            tokens_used: Some(completion.tokens_used),
            ..AiAnalysisResponse::default()
        })
    }

    async fn classify(&self, text: &str) -> Result<AiAnalysisResponse, AiError> {
        let completion = self
            .model()?
            .complete(ChatRequest {
                system: "Классифицируй тип документа. Верни JSON.".to_string(),
                user: format!(
                    "Определи тип документа:\n\n{}\n\n{}",
                    truncate_chars(text, 2000),
                    CLASSIFY_FORMAT
                ),
                temperature: 0.1,
                max_tokens: None,
                json_mode: true,
            })
            .await?;

        let value: Value = serde_json::from_str(&completion.content)?;
        Ok(AiAnalysisResponse {
            document_type: string_field(&value, "document_type"),
            document_type_ru: string_field(&value, "document_type_ru"),
            confidence: number_field(&value, "confidence"),
            reasoning: string_field(&value, "reasoning"),
            tokens_used: Some(completion.tokens_used),
            ..AiAnalysisResponse::default()
        })
    }

    async fn extract_data(&self, text: &str) -> Result<AiAnalysisResponse, AiError> {
        let completion = self
            .model()?
            .complete(ChatRequest {
                system: "Извлеки структурированные данные из документа. Верни JSON.".to_string(),
                user: format!(
                    "Извлеки данные из документа:\n\n{}\n\n{}",
                    truncate_chars(text, 4000),
                    EXTRACT_FORMAT
                ),
                temperature: 0.1,
                max_tokens: None,
                json_mode: true,
            })
            .await?;

        let value: Value = serde_json::from_str(&completion.content)?;
        Ok(AiAnalysisResponse {
            extracted_data: Some(value),
            tokens_used: Some(completion.tokens_used),
            ..AiAnalysisResponse::default()
        })
    }

    /// Explain a contract in plain business language.
    pub async fn explain_contract(&self, text: &str) -> ExplainContractResponse {
        let started = Instant::now();
        let result = self.run_explain(text).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(completion) => ExplainContractResponse {
                success: true,
                explanation: Some(completion.content),
                tokens_used: Some(completion.tokens_used),
                processing_time_ms: elapsed_ms,
                error: None,
            },
            Err(error) => {
                warn!("contract explanation failed: {}", error);
                ExplainContractResponse {
                    success: false,
                    explanation: None,
                    tokens_used: None,
                    processing_time_ms: elapsed_ms,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    async fn run_explain(&self, text: &str) -> Result<ChatCompletion, AiError> {
        self.model()?
            .complete(ChatRequest {
                system: EXPLAIN_SYSTEM.to_string(),
                user: format!(
                    "Объясни этот договор простым языком:\n\n{}\n\n{}",
                    truncate_chars(text, 5000),
                    EXPLAIN_STRUCTURE
                ),
                temperature: 0.3,
                max_tokens: Some(2000),
                json_mode: false,
            })
            .await
    }

    /// Extract data from free text, shaped for one of the generation
    /// request payloads.
    pub async fn extract_for_generation(
        &self,
        text: &str,
        target: DocumentKind,
    ) -> ExtractForGenerationResponse {
        let started = Instant::now();
        let result = self.run_extract_for_generation(text, target).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok((data, tokens_used)) => ExtractForGenerationResponse {
                success: true,
                data: Some(data),
                tokens_used: Some(tokens_used),
                processing_time_ms: elapsed_ms,
                error: None,
            },
            Err(error) => {
                warn!("extraction for generation failed: {}", error);
                ExtractForGenerationResponse {
                    success: false,
                    data: None,
                    tokens_used: None,
                    processing_time_ms: elapsed_ms,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    async fn run_extract_for_generation(
        &self,
        text: &str,
        target: DocumentKind,
    ) -> Result<(Value, u32), AiError> {
        let name = target.russian_name();
        let completion = self
            .model()?
            .complete(ChatRequest {
                system: format!(
                    "Извлеки данные для генерации документа типа '{}'. Верни JSON.",
                    name
                ),
                user: format!(
                    "Извлеки данные из текста для генерации {}:\n\n{}\n\n{}",
                    name,
                    truncate_chars(text, 4000),
                    GENERATION_FIELDS
                ),
                temperature: 0.1,
                max_tokens: None,
                json_mode: true,
            })
            .await?;

        let value: Value = serde_json::from_str(&completion.content)?;
        Ok((value, completion.tokens_used))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn object_field(value: &Value, key: &str) -> Option<Value> {
    value.get(key).cloned().filter(|v| !v.is_null())
}

fn number_field(value: &Value, key: &str) -> Option<f32> {
    value.get(key).and_then(Value::as_f64).map(|v| v as f32)
}

/// Cut at a character boundary so multi-byte Cyrillic never splits.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
