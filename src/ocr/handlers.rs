use std::path::{Path, PathBuf};
use std::time::Instant;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use log::warn;
use sanitize_filename::sanitize;

use crate::state::AppState;
use crate::ErrorResponse;

use super::models::{default_language, Base64OcrForm, OcrResponse, OcrUploadForm};
use super::service::OcrService;

/// Fields extracted from the /ocr/process multipart form.
struct OcrUpload {
    bytes: Vec<u8>,
    filename: String,
    language: String,
}

#[derive(Debug, thiserror::Error)]
enum UploadParseError {
    #[error("Multipart field error: {0}")]
    Field(String),
    #[error("Файл не передан")]
    MissingFile,
    #[error("Неподдерживаемый формат файла: {0}")]
    UnsupportedFormat(String),
}

impl From<UploadParseError> for HttpResponse {
    fn from(error: UploadParseError) -> Self {
        match error {
            UploadParseError::Field(_) => {
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&error.to_string()))
            }
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

async fn parse_ocr_multipart(mut payload: Multipart) -> Result<OcrUpload, UploadParseError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut language = default_language();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadParseError::Field(e.to_string()))?
    {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| UploadParseError::Field("Content-Disposition not set".to_string()))?;
        let field_name = content_disposition
            .get_name()
            .ok_or_else(|| UploadParseError::Field("No field name".to_string()))?;

        match field_name {
            "file" => {
                let filename = content_disposition
                    .get_filename()
                    .map(sanitize)
                    .unwrap_or_else(|| "upload".to_string());

                let extension = Path::new(&filename)
                    .extension()
                    .and_then(std::ffi::OsStr::to_str)
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if !OcrService::supported_extension(&extension) {
                    return Err(UploadParseError::UnsupportedFormat(format!(
                        ".{}",
                        extension
                    )));
                }

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| UploadParseError::Field(e.to_string()))?
                {
                    bytes.extend_from_slice(&chunk);
                }
                file = Some((bytes, filename));
            }
            "language" => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| UploadParseError::Field(e.to_string()))?
                {
                    bytes.extend_from_slice(&chunk);
                }
                language = String::from_utf8_lossy(&bytes).trim().to_string();
            }
            // company_id arrives from the main application and is accepted
            // without being used here.
            _ => continue,
        }
    }

    let (bytes, filename) = file.ok_or(UploadParseError::MissingFile)?;
    Ok(OcrUpload {
        bytes,
        filename,
        language,
    })
}

#[utoipa::path(
    context_path = "/ocr",
    tag = "OCR",
    post,
    path = "/process",
    request_body(content = inline(OcrUploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recognition outcome; check the success flag", body = OcrResponse),
        (status = 400, description = "Неподдерживаемый формат или пустая форма", body = ErrorResponse)
    )
)]
pub async fn process_upload(payload: Multipart, data: web::Data<AppState>) -> impl Responder {
    let started = Instant::now();

    let upload = match parse_ocr_multipart(payload).await {
        Ok(upload) => upload,
        Err(error) => return error.into(),
    };

    // The upload hits disk under its own name so tesseract can dispatch on
    // the extension; it is removed again whatever the outcome.
    let stored_path: PathBuf = data
        .config
        .upload_dir
        .join(format!("ocr_{}", upload.filename));

    let service = data.ocr;
    let language = upload.language.clone();
    let write_path = stored_path.clone();
    let bytes = upload.bytes;
    let result = web::block(move || -> Result<_, super::OcrError> {
        std::fs::write(&write_path, &bytes)?;
        service.process_file(&write_path, &language)
    })
    .await;

    if let Err(error) = std::fs::remove_file(&stored_path) {
        if error.kind() != std::io::ErrorKind::NotFound {
            warn!("failed to remove {}: {}", stored_path.display(), error);
        }
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(OcrResponse::completed(outcome, elapsed_ms)),
        Ok(Err(error)) => {
            warn!("OCR failed for {}: {}", upload.filename, error);
            HttpResponse::Ok().json(OcrResponse::failed(error.to_string()))
        }
        Err(error) => {
            warn!("OCR task aborted: {}", error);
            HttpResponse::Ok().json(OcrResponse::failed(error.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/ocr",
    tag = "OCR",
    post,
    path = "/process-base64",
    request_body(content = Base64OcrForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Recognition outcome; check the success flag", body = OcrResponse)
    )
)]
pub async fn process_base64(
    form: web::Form<Base64OcrForm>,
    data: web::Data<AppState>,
) -> impl Responder {
    let started = Instant::now();
    let form = form.into_inner();

    let service = data.ocr;
    let result = web::block(move || service.process_base64(&form.image, &form.language)).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(OcrResponse::completed(outcome, elapsed_ms)),
        Ok(Err(error)) => HttpResponse::Ok().json(OcrResponse::failed(error.to_string())),
        Err(error) => {
            warn!("OCR task aborted: {}", error);
            HttpResponse::Ok().json(OcrResponse::failed(error.to_string()))
        }
    }
}
