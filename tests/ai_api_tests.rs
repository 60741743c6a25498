use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use burocrat_ai_service::ai::{
    handlers, AiAnalyzer, AiError, ChatCompletion, ChatModel, ChatRequest,
};
use burocrat_ai_service::documents::DocumentService;
use burocrat_ai_service::ocr::OcrService;
use burocrat_ai_service::{AppConfig, AppState};

/// Model stand-in that replays a fixed reply and records nothing.
struct ScriptedModel {
    content: String,
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatCompletion, AiError> {
        Ok(ChatCompletion {
            content: self.content.clone(),
            tokens_used: 42,
        })
    }
}

/// Model stand-in that always fails.
struct BrokenModel;

#[async_trait]
impl ChatModel for BrokenModel {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatCompletion, AiError> {
        Err(AiError::EmptyResponse)
    }
}

fn test_state(analyzer: AiAnalyzer) -> web::Data<AppState> {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        openai_api_key: String::new(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        upload_dir: "./uploads".into(),
        generated_dir: "./generated".into(),
    };
    web::Data::new(AppState {
        documents: DocumentService::new("./generated"),
        ocr: OcrService::new(),
        analyzer,
        config,
    })
}

macro_rules! ai_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state.clone()).service(
                web::scope("/ai")
                    .route("/analyze", web::post().to(handlers::analyze_document))
                    .route(
                        "/explain-contract",
                        web::post().to(handlers::explain_contract),
                    )
                    .route(
                        "/extract-for-generation",
                        web::post().to(handlers::extract_for_generation),
                    )
                    .route("/classify", web::post().to(handlers::classify_document))
                    .route("/summarize", web::post().to(handlers::summarize_document)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn classify_surfaces_the_model_json() {
    let analyzer = AiAnalyzer::with_model(Arc::new(ScriptedModel {
        content: json!({
            "document_type": "invoice",
            "document_type_ru": "счёт на оплату",
            "confidence": 93,
            "reasoning": "упоминается оплата по счёту"
        })
        .to_string(),
    }));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/classify?text=%D0%A1%D1%87%D1%91%D1%82%20%E2%84%96%201")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["document_type"], "invoice");
    assert_eq!(body["document_type_ru"], "счёт на оплату");
    assert_eq!(body["confidence"], 93.0);
    assert_eq!(body["tokens_used"], 42);
}

#[actix_web::test]
async fn analyze_rejects_short_text_before_the_model_runs() {
    let analyzer = AiAnalyzer::with_model(Arc::new(BrokenModel));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/analyze")
        .set_json(json!({"text": "короткий"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "BadRequest");
}

#[actix_web::test]
async fn analyze_rejects_unknown_analysis_kinds() {
    let analyzer = AiAnalyzer::with_model(Arc::new(BrokenModel));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/analyze")
        .set_json(json!({
            "text": "Достаточно длинный текст документа",
            "analyze_type": "deep"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn unconfigured_analyzer_reports_the_missing_key() {
    let dirs = tempfile::TempDir::new().unwrap();
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        openai_api_key: String::new(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        upload_dir: dirs.path().to_path_buf(),
        generated_dir: dirs.path().to_path_buf(),
    };
    let analyzer = AiAnalyzer::from_config(reqwest::Client::new(), &config);
    assert!(!analyzer.is_configured());
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/analyze")
        .set_json(json!({"text": "Достаточно длинный текст документа"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 500);

    let body: Value = test::read_body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("OpenAI API ключ не настроен"));
}

#[actix_web::test]
async fn explain_contract_needs_fifty_characters() {
    let analyzer = AiAnalyzer::with_model(Arc::new(ScriptedModel {
        content: "Объяснение договора простым языком".to_string(),
    }));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/explain-contract")
        .set_json(json!({"text": "мало"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let long_text = "Договор поставки товаров между двумя организациями сроком на один год";
    let request = test::TestRequest::post()
        .uri("/ai/explain-contract")
        .set_json(json!({"text": long_text}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["explanation"], "Объяснение договора простым языком");
}

#[actix_web::test]
async fn extract_for_generation_validates_the_target_type() {
    let analyzer = AiAnalyzer::with_model(Arc::new(ScriptedModel {
        content: json!({"seller": {"name": "ООО «Ромашка»"}}).to_string(),
    }));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/extract-for-generation")
        .set_json(json!({
            "text": "Счёт на оплату № 12 от ООО «Ромашка»",
            "target_type": "contract"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let request = test::TestRequest::post()
        .uri("/ai/extract-for-generation")
        .set_json(json!({
            "text": "Счёт на оплату № 12 от ООО «Ромашка»",
            "target_type": "invoice"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["seller"]["name"], "ООО «Ромашка»");
}

#[actix_web::test]
async fn model_failure_folds_into_a_500_envelope() {
    let analyzer = AiAnalyzer::with_model(Arc::new(BrokenModel));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/summarize?text=%D0%94%D0%BE%D0%BA%D1%83%D0%BC%D0%B5%D0%BD%D1%82")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 500);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "InternalServerError");
}

#[actix_web::test]
async fn invalid_model_json_is_an_analysis_error() {
    let analyzer = AiAnalyzer::with_model(Arc::new(ScriptedModel {
        content: "это не JSON".to_string(),
    }));
    let app = ai_app!(test_state(analyzer));

    let request = test::TestRequest::post()
        .uri("/ai/analyze")
        .set_json(json!({
            "text": "Достаточно длинный текст документа",
            "analyze_type": "classify"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 500);

    let body: Value = test::read_body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("модель вернула некорректный JSON"));
}
