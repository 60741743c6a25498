use actix_files::NamedFile;
use actix_web::{web, Either, HttpResponse, Responder};
use log::warn;

use crate::metrics::DOCUMENTS_GENERATED;
use crate::state::AppState;
use crate::ErrorResponse;

use super::schema::{
    CompletionActRequest, DocumentKind, GeneratedDocument, InvoiceRequest, WaybillRequest,
};
use super::service::StoredDocument;
use super::GeneratorError;

type BlockedGeneration =
    Result<Result<StoredDocument, GeneratorError>, actix_web::error::BlockingError>;

/// Fold the blocking-call result into the response envelope. Failures stay
/// HTTP 200 with `success: false`, so callers branch on the flag instead of
/// the status code.
fn into_envelope(kind: DocumentKind, result: BlockedGeneration) -> GeneratedDocument {
    match result {
        Ok(Ok(stored)) => {
            DOCUMENTS_GENERATED
                .with_label_values(&[kind.file_stem(), "success"])
                .inc();
            GeneratedDocument::completed(
                stored.kind,
                &stored.number,
                stored.path.display().to_string(),
                format!("/files/{}", stored.filename),
                stored.total,
            )
        }
        Ok(Err(err)) => {
            warn!("{} generation failed: {}", kind.file_stem(), err);
            DOCUMENTS_GENERATED
                .with_label_values(&[kind.file_stem(), "failure"])
                .inc();
            GeneratedDocument::failed(kind, err.to_string())
        }
        Err(err) => {
            warn!("{} generation task aborted: {}", kind.file_stem(), err);
            DOCUMENTS_GENERATED
                .with_label_values(&[kind.file_stem(), "failure"])
                .inc();
            GeneratedDocument::failed(kind, err.to_string())
        }
    }
}

#[utoipa::path(
    context_path = "/generate",
    tag = "Document Generation",
    post,
    path = "/invoice",
    request_body = InvoiceRequest,
    responses(
        (status = 200, description = "Generation outcome; check the success flag", body = GeneratedDocument)
    )
)]
pub async fn generate_invoice(
    request: web::Json<InvoiceRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let service = data.documents.clone();
    let request = request.into_inner();
    let result = web::block(move || service.generate_invoice(&request)).await;
    HttpResponse::Ok().json(into_envelope(DocumentKind::Invoice, result))
}

#[utoipa::path(
    context_path = "/generate",
    tag = "Document Generation",
    post,
    path = "/waybill",
    request_body = WaybillRequest,
    responses(
        (status = 200, description = "Generation outcome; check the success flag", body = GeneratedDocument)
    )
)]
pub async fn generate_waybill(
    request: web::Json<WaybillRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let service = data.documents.clone();
    let request = request.into_inner();
    let result = web::block(move || service.generate_waybill(&request)).await;
    HttpResponse::Ok().json(into_envelope(DocumentKind::Waybill, result))
}

#[utoipa::path(
    context_path = "/generate",
    tag = "Document Generation",
    post,
    path = "/completion-act",
    request_body = CompletionActRequest,
    responses(
        (status = 200, description = "Generation outcome; check the success flag", body = GeneratedDocument)
    )
)]
pub async fn generate_completion_act(
    request: web::Json<CompletionActRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let service = data.documents.clone();
    let request = request.into_inner();
    let result = web::block(move || service.generate_completion_act(&request)).await;
    HttpResponse::Ok().json(into_envelope(DocumentKind::CompletionAct, result))
}

#[utoipa::path(
    context_path = "/generate",
    tag = "Document Generation",
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Имя файла из file_url ответа генерации")
    ),
    responses(
        (status = 200, description = "PDF файл документа"),
        (status = 404, description = "Файл не найден", body = ErrorResponse)
    )
)]
pub async fn download_document(
    filename: web::Path<String>,
    data: web::Data<AppState>,
) -> Either<NamedFile, HttpResponse> {
    // Path traversal dies here: the stored name never contains separators.
    let safe_name = sanitize_filename::sanitize(filename.as_str());
    let path = data.documents.generated_path(&safe_name);
    match NamedFile::open_async(&path).await {
        Ok(file) => Either::Left(file),
        Err(_) => Either::Right(
            HttpResponse::NotFound().json(ErrorResponse::not_found("Файл не найден")),
        ),
    }
}
