use actix_web::{test, web, App};
use serde_json::Value;
use tempfile::TempDir;

use burocrat_ai_service::ai::AiAnalyzer;
use burocrat_ai_service::documents::DocumentService;
use burocrat_ai_service::ocr::{handlers, OcrService};
use burocrat_ai_service::{AppConfig, AppState};

fn test_state(dirs: &TempDir) -> web::Data<AppState> {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        openai_api_key: String::new(),
        openai_base_url: "https://api.openai.com/v1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        upload_dir: dirs.path().to_path_buf(),
        generated_dir: dirs.path().to_path_buf(),
    };
    web::Data::new(AppState {
        documents: DocumentService::new(dirs.path()),
        ocr: OcrService::new(),
        analyzer: AiAnalyzer::from_config(reqwest::Client::new(), &config),
        config,
    })
}

macro_rules! ocr_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state.clone()).service(
                web::scope("/ocr")
                    .route("/process", web::post().to(handlers::process_upload))
                    .route("/process-base64", web::post().to(handlers::process_base64)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn base64_decode_failure_folds_into_the_envelope() {
    let dirs = TempDir::new().unwrap();
    let app = ocr_app!(test_state(&dirs));

    let request = test::TestRequest::post()
        .uri("/ocr/process-base64")
        .set_form([("image", "%%%not-base64%%%"), ("language", "rus")])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Некорректные base64 данные"));
}

#[actix_web::test]
async fn invalid_language_fails_before_any_decoding() {
    let dirs = TempDir::new().unwrap();
    let app = ocr_app!(test_state(&dirs));

    let request = test::TestRequest::post()
        .uri("/ocr/process-base64")
        .set_form([("image", "aGVsbG8="), ("language", "rus;reboot")])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Недопустимый код языка"));
}

#[actix_web::test]
async fn multipart_without_a_file_is_a_bad_request() {
    let dirs = TempDir::new().unwrap();
    let app = ocr_app!(test_state(&dirs));

    let boundary = "----TestBoundary42";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\nrus\r\n--{boundary}--\r\n"
    );
    let request = test::TestRequest::post()
        .uri("/ocr/process")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let json: Value = test::read_body_json(response).await;
    assert_eq!(json["message"], "Файл не передан");
}

#[actix_web::test]
async fn unsupported_upload_extension_is_rejected_up_front() {
    let dirs = TempDir::new().unwrap();
    let app = ocr_app!(test_state(&dirs));

    let boundary = "----TestBoundary42";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"report.docx\"\r\nContent-Type: application/octet-stream\r\n\r\nPK\r\n--{boundary}--\r\n"
    );
    let request = test::TestRequest::post()
        .uri("/ocr/process")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let json: Value = test::read_body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains(".docx"));
}
