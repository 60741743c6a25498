use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod ai;
pub mod config;
pub mod documents;
pub mod metrics;
pub mod ocr;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Описание сервиса, отдаётся на корневом пути.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[utoipa::path(
    tag = "Service",
    get,
    path = "/",
    responses((status = 200, description = "Описание сервиса", body = ServiceInfo))
)]
pub async fn service_info() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        service: "Burocrat AI Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "/generate/invoice".to_string(),
            "/generate/waybill".to_string(),
            "/generate/completion-act".to_string(),
            "/generate/download/{filename}".to_string(),
            "/ocr/process".to_string(),
            "/ocr/process-base64".to_string(),
            "/ai/analyze".to_string(),
            "/ai/explain-contract".to_string(),
            "/ai/extract-for-generation".to_string(),
            "/ai/classify".to_string(),
            "/ai/summarize".to_string(),
        ],
    })
}

/// Ответ проверки работоспособности.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Настроен ли ключ OpenAI; без него AI-эндпоинты отвечают ошибкой
    pub openai_configured: bool,
}

#[utoipa::path(
    tag = "Service",
    get,
    path = "/health",
    responses((status = 200, description = "Сервис работает", body = HealthResponse))
)]
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        openai_configured: data.analyzer.is_configured(),
    })
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::service_info,
            crate::health,
            crate::documents::handlers::generate_invoice,
            crate::documents::handlers::generate_waybill,
            crate::documents::handlers::generate_completion_act,
            crate::documents::handlers::download_document,
            crate::ocr::handlers::process_upload,
            crate::ocr::handlers::process_base64,
            crate::ai::handlers::analyze_document,
            crate::ai::handlers::explain_contract,
            crate::ai::handlers::extract_for_generation,
            crate::ai::handlers::classify_document,
            crate::ai::handlers::summarize_document
        ),
        components(
            schemas(
                ServiceInfo,
                HealthResponse,
                ErrorResponse,
                documents::schema::DocumentKind,
                documents::schema::PartyInfo,
                documents::schema::LineItem,
                documents::schema::InvoiceRequest,
                documents::schema::WaybillRequest,
                documents::schema::CompletionActRequest,
                documents::schema::GeneratedDocument,
                ocr::models::OcrResponse,
                ocr::models::Base64OcrForm,
                ai::models::AnalyzeTextRequest,
                ai::models::ExplainContractRequest,
                ai::models::ExtractForGenerationRequest,
                ai::models::TextQuery,
                ai::models::AiAnalysisResponse,
                ai::models::ExplainContractResponse,
                ai::models::ExtractForGenerationResponse,
            )
        ),
        tags(
            (name = "Service", description = "Service info and health."),
            (name = "Document Generation", description = "Invoice, waybill and completion act PDFs."),
            (name = "OCR", description = "Text recognition for images and PDF scans."),
            (name = "AI Analysis", description = "Document analysis over a language model.")
        )
    )]
    struct ApiDoc;

    let config = AppConfig::from_env().context("failed to read configuration")?;
    config.ensure_dirs()?;
    let bind_addr = (config.host.clone(), config.port);
    let generated_dir = config.generated_dir.clone();
    let app_state = web::Data::new(AppState::from_config(config));

    let prometheus = PrometheusMetricsBuilder::new("burocrat_ai_service")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");
    prometheus
        .registry
        .register(Box::new(metrics::DOCUMENTS_GENERATED.clone()))
        .expect("Failed to register document metrics");

    log::info!("Starting server at http://{}:{}", bind_addr.0, bind_addr.1);
    if !app_state.analyzer.is_configured() {
        log::warn!("OPENAI_API_KEY is not set; AI endpoints will report errors");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .route("/", web::get().to(service_info))
            .route("/health", web::get().to(health))
            .service(
                web::scope("/generate")
                    .route(
                        "/invoice",
                        web::post().to(documents::handlers::generate_invoice),
                    )
                    .route(
                        "/waybill",
                        web::post().to(documents::handlers::generate_waybill),
                    )
                    .route(
                        "/completion-act",
                        web::post().to(documents::handlers::generate_completion_act),
                    )
                    .route(
                        "/download/{filename}",
                        web::get().to(documents::handlers::download_document),
                    ),
            )
            .service(
                web::scope("/ocr")
                    .route("/process", web::post().to(ocr::handlers::process_upload))
                    .route(
                        "/process-base64",
                        web::post().to(ocr::handlers::process_base64),
                    ),
            )
            .service(
                web::scope("/ai")
                    .route("/analyze", web::post().to(ai::handlers::analyze_document))
                    .route(
                        "/explain-contract",
                        web::post().to(ai::handlers::explain_contract),
                    )
                    .route(
                        "/extract-for-generation",
                        web::post().to(ai::handlers::extract_for_generation),
                    )
                    .route("/classify", web::post().to(ai::handlers::classify_document))
                    .route(
                        "/summarize",
                        web::post().to(ai::handlers::summarize_document),
                    ),
            )
            .service(actix_files::Files::new("/files", generated_dir.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
