use crate::ai::AiAnalyzer;
use crate::config::AppConfig;
use crate::documents::DocumentService;
use crate::ocr::OcrService;

/// Process-wide services, built once at startup and shared across workers
/// through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub documents: DocumentService,
    pub ocr: OcrService,
    pub analyzer: AiAnalyzer,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("burocrat-ai-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create reqwest client");

        Self {
            documents: DocumentService::new(config.generated_dir.clone()),
            ocr: OcrService::new(),
            analyzer: AiAnalyzer::from_config(http_client, &config),
            config,
        }
    }
}
