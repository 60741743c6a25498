use actix_web::{web, HttpResponse, Responder};

use crate::documents::DocumentKind;
use crate::state::AppState;
use crate::ErrorResponse;

use super::analyzer::AnalyzeKind;
use super::models::{
    AiAnalysisResponse, AnalyzeTextRequest, ExplainContractRequest, ExplainContractResponse,
    ExtractForGenerationRequest, ExtractForGenerationResponse, TextQuery,
};

fn parse_target(value: &str) -> Option<DocumentKind> {
    match value {
        "invoice" => Some(DocumentKind::Invoice),
        "waybill" => Some(DocumentKind::Waybill),
        "completion_act" => Some(DocumentKind::CompletionAct),
        _ => None,
    }
}

fn analysis_response(response: AiAnalysisResponse) -> HttpResponse {
    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        let message = response.error.as_deref().unwrap_or("Ошибка анализа");
        HttpResponse::InternalServerError().json(ErrorResponse::internal_error(message))
    }
}

#[utoipa::path(
    context_path = "/ai",
    tag = "AI Analysis",
    post,
    path = "/analyze",
    request_body = AnalyzeTextRequest,
    responses(
        (status = 200, description = "Результат анализа", body = AiAnalysisResponse),
        (status = 400, description = "Неверный тип анализа или слишком короткий текст", body = ErrorResponse),
        (status = 500, description = "Ошибка анализа", body = ErrorResponse)
    )
)]
pub async fn analyze_document(
    request: web::Json<AnalyzeTextRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if request.text.chars().count() < 10 {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "текст должен содержать не менее 10 символов",
        ));
    }
    let Some(kind) = AnalyzeKind::parse(&request.analyze_type) else {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "analyze_type должен быть: full, summary, extract, classify",
        ));
    };

    analysis_response(data.analyzer.analyze(&request.text, kind).await)
}

#[utoipa::path(
    context_path = "/ai",
    tag = "AI Analysis",
    post,
    path = "/explain-contract",
    request_body = ExplainContractRequest,
    responses(
        (status = 200, description = "Объяснение договора", body = ExplainContractResponse),
        (status = 400, description = "Слишком короткий текст", body = ErrorResponse),
        (status = 500, description = "Ошибка анализа", body = ErrorResponse)
    )
)]
pub async fn explain_contract(
    request: web::Json<ExplainContractRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if request.text.chars().count() < 50 {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "текст договора должен содержать не менее 50 символов",
        ));
    }

    let response = data.analyzer.explain_contract(&request.text).await;
    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        let message = response.error.as_deref().unwrap_or("Ошибка анализа");
        HttpResponse::InternalServerError().json(ErrorResponse::internal_error(message))
    }
}

#[utoipa::path(
    context_path = "/ai",
    tag = "AI Analysis",
    post,
    path = "/extract-for-generation",
    request_body = ExtractForGenerationRequest,
    responses(
        (status = 200, description = "Данные для генерации документа", body = ExtractForGenerationResponse),
        (status = 400, description = "Неверный тип документа или слишком короткий текст", body = ErrorResponse),
        (status = 500, description = "Ошибка извлечения", body = ErrorResponse)
    )
)]
pub async fn extract_for_generation(
    request: web::Json<ExtractForGenerationRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if request.text.chars().count() < 10 {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "текст должен содержать не менее 10 символов",
        ));
    }
    let Some(target) = parse_target(&request.target_type) else {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "target_type должен быть: invoice, waybill, completion_act",
        ));
    };

    let response: ExtractForGenerationResponse = data
        .analyzer
        .extract_for_generation(&request.text, target)
        .await;
    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        let message = response.error.as_deref().unwrap_or("Ошибка извлечения");
        HttpResponse::InternalServerError().json(ErrorResponse::internal_error(message))
    }
}

#[utoipa::path(
    context_path = "/ai",
    tag = "AI Analysis",
    post,
    path = "/classify",
    params(
        ("text" = String, Query, description = "Текст документа")
    ),
    responses(
        (status = 200, description = "Тип документа", body = AiAnalysisResponse),
        (status = 500, description = "Ошибка классификации", body = ErrorResponse)
    )
)]
pub async fn classify_document(
    query: web::Query<TextQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    analysis_response(data.analyzer.analyze(&query.text, AnalyzeKind::Classify).await)
}

#[utoipa::path(
    context_path = "/ai",
    tag = "AI Analysis",
    post,
    path = "/summarize",
    params(
        ("text" = String, Query, description = "Текст документа")
    ),
    responses(
        (status = 200, description = "Краткое резюме", body = AiAnalysisResponse),
        (status = 500, description = "Ошибка создания резюме", body = ErrorResponse)
    )
)]
pub async fn summarize_document(
    query: web::Query<TextQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    analysis_response(data.analyzer.analyze(&query.text, AnalyzeKind::Summary).await)
}
