/*!
 * Request handlers for the admin HTTP surface.
 *
 * Batch invocations return 200 with a report even when individual records
 * failed; only a missing provider credential or a failed candidate fetch is
 * a 500. Single-record jobs surface their failure class directly.
 */

use std::time::Duration;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use log::error;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::{ProviderError, TranslationError};
use crate::store::{FieldPlan, RecordKind};
use crate::translation::{
    BatchOptions, BatchRunner, SourceFields, TextDirection, TranslationService,
};

use super::AppState;

type ApiResponse = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiResponse {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

fn server_error(message: String) -> ApiResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message })),
    )
}

/// Build the translation service, mapping a missing credential to the
/// batch-fatal 500 the dashboard expects
fn service_for(state: &AppState) -> Result<TranslationService, ApiResponse> {
    TranslationService::from_config(&state.config).map_err(|e| match e {
        ProviderError::MissingApiKey(_) => {
            error!("Provider credential missing: {}", e);
            server_error("AI service is not configured.".to_string())
        }
        other => server_error(other.to_string()),
    })
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> ApiResponse {
    match state.repository.database().stats() {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "records": {
                    "itinerary": stats.itinerary_count,
                    "tasks": stats.task_count,
                    "info_cards": stats.info_card_count,
                }
            })),
        ),
        Err(e) => server_error(format!("Store unavailable: {}", e)),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchTranslateRequest {
    /// Record kind; absent or "all" runs every kind
    pub kind: Option<String>,
    /// Source language override
    pub source: Option<String>,
    /// Target language override
    pub target: Option<String>,
    /// Re-translate filled targets
    #[serde(default)]
    pub force: bool,
    /// Pacing override in milliseconds
    pub delay_ms: Option<u64>,
}

/// POST /api/admin/batch-translate
pub async fn batch_translate(
    State(state): State<AppState>,
    payload: Result<Json<BatchTranslateRequest>, JsonRejection>,
) -> ApiResponse {
    // Whole-table jobs are triggered with an empty POST; treat a missing
    // body as the all-defaults request.
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let service = match service_for(&state) {
        Ok(service) => service,
        Err(response) => return response,
    };

    let source = request
        .source
        .unwrap_or_else(|| state.config.source_language.clone());
    let target = request
        .target
        .unwrap_or_else(|| state.config.target_language.clone());

    let options = BatchOptions {
        inter_item_delay: Duration::from_millis(
            request.delay_ms.unwrap_or(state.config.batch.inter_item_delay_ms),
        ),
        force: request.force,
    };
    let runner = BatchRunner::new(service, state.repository.clone(), options);

    match request.kind.as_deref() {
        None | Some("all") => match runner.run_all_kinds(&source, &target).await {
            Ok(report) => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!(
                        "Batch translation completed. Processed: {}, Updated: {}, Errors: {}",
                        report.total_processed(),
                        report.total_updated(),
                        report.total_errors()
                    ),
                    "results": report,
                })),
            ),
            Err(e) => {
                error!("Batch translation failed: {:#}", e);
                server_error(format!("Batch translation failed: {}", e))
            }
        },
        Some(kind) => {
            let kind: RecordKind = match kind.parse() {
                Ok(kind) => kind,
                Err(e) => return bad_request(&e.to_string()),
            };
            let plan = match FieldPlan::new(kind, &source, &target) {
                Ok(plan) => plan,
                Err(e) => return bad_request(&e.to_string()),
            };

            match runner.run_batch(&plan).await {
                Ok(report) => (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "message": format!("Batch translation completed: {}", report.summary()),
                        "report": report,
                    })),
                ),
                Err(e) => {
                    error!("Batch translation failed: {:#}", e);
                    server_error(format!("Batch translation failed: {}", e))
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRecordRequest {
    pub kind: String,
    pub id: i64,
    pub source: SourcePayload,
}

/// POST /api/admin/translate-record
pub async fn translate_record(
    State(state): State<AppState>,
    Json(request): Json<TranslateRecordRequest>,
) -> ApiResponse {
    let kind: RecordKind = match request.kind.parse() {
        Ok(kind) => kind,
        Err(e) => return bad_request(&e.to_string()),
    };

    let title = match request.source.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return bad_request("Missing required fields: kind, id, source with title"),
    };
    let secondary = match kind {
        RecordKind::Note => request.source.content,
        _ => request.source.description,
    };
    let source_fields = SourceFields::new(title, secondary);

    let service = match service_for(&state) {
        Ok(service) => service,
        Err(response) => return response,
    };

    let plan = match FieldPlan::new(
        kind,
        &state.config.source_language,
        &state.config.target_language,
    ) {
        Ok(plan) => plan,
        Err(e) => return bad_request(&e.to_string()),
    };

    let target = match service.translate_record(&plan, &source_fields).await {
        Ok(target) => target,
        Err(TranslationError::EmptyTitle) => {
            return bad_request("Missing required fields: kind, id, source with title");
        }
        Err(e @ TranslationError::UnparsableResponse(_)) => {
            error!("translate-record: {}", e);
            return server_error("Failed to parse AI translation response.".to_string());
        }
        Err(e @ TranslationError::IncompleteResponse(_)) => {
            error!("translate-record: {}", e);
            return server_error(format!("Translation incomplete: {}", e));
        }
        Err(e) => {
            error!("translate-record: {}", e);
            return server_error(format!("Translation failed: {}", e));
        }
    };

    let updates = target.into_updates(&plan);
    if let Err(e) = state
        .repository
        .update_fields(kind, request.id, &updates)
        .await
    {
        error!("translate-record: update failed: {:#}", e);
        return server_error(format!("Failed to update record: {}", e));
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Translation completed successfully",
            "data": updates,
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct TranslateTextRequest {
    pub text: Option<String>,
    pub direction: Option<String>,
}

/// POST /api/translate
pub async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslateTextRequest>,
) -> ApiResponse {
    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return bad_request("Text is required."),
    };
    let direction: TextDirection = match request.direction.as_deref().unwrap_or("").parse() {
        Ok(direction) => direction,
        Err(_) => return bad_request("Direction must be 'vi2ko' or 'ko2vi'."),
    };

    let service = match service_for(&state) {
        Ok(service) => service,
        Err(response) => return response,
    };

    match service.translate_text(&text, direction).await {
        Ok(translation) => (StatusCode::OK, Json(json!({ "translation": translation }))),
        Err(e) => {
            error!("translate: {}", e);
            server_error(format!("Translation failed: {}", e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// POST /api/chat
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> ApiResponse {
    let message = match request.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => return bad_request("Message is required."),
    };

    let service = match service_for(&state) {
        Ok(service) => service,
        Err(response) => return response,
    };

    let assistant = crate::assistant::Assistant::new(service, state.repository.clone());
    match assistant.reply(&message).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))),
        Err(e) => {
            error!("chat: {}", e);
            server_error("Unexpected error in chat API.".to_string())
        }
    }
}
