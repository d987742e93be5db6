use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    api::{
        error::ApiError,
        types::{
            ClassifyRequest, ClassifyResponse, CreateComplaintRequest, CreateComplaintResponse,
            PingResponse,
        },
        AppState,
    },
    classifier::detect_language,
    model::{ComplaintRecord, Language},
    ticket::open_ticket,
};

fn require_text(text: Option<Value>) -> Result<String, ApiError> {
    match text {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::INVALID_TEXT),
    }
}

fn optional_language(language: Option<Value>) -> Result<Option<Language>, ApiError> {
    match language {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(code)) => code
            .parse::<Language>()
            .map(Some)
            .map_err(|_| ApiError::INVALID_LANGUAGE),
        Some(_) => Err(ApiError::INVALID_LANGUAGE),
    }
}

pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.ping_message.to_string(),
    })
}

pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "rejected classify body");
        ApiError::INVALID_TEXT
    })?;
    let text = require_text(req.text)?;

    let language = detect_language(&text);
    let classification = state.classifier.classify(&text).await;

    Ok(Json(ClassifyResponse {
        category: classification.category,
        confidence: classification.confidence(),
        language,
    }))
}

pub async fn create_complaint(
    State(state): State<AppState>,
    payload: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateComplaintResponse>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "rejected complaint body");
        ApiError::INVALID_TEXT
    })?;
    let text = require_text(req.text)?;
    let language = optional_language(req.language)?;

    let record = open_ticket(&state.store, &state.classifier, &text, language)
        .await
        .map_err(|err| {
            error!(error = ?err, "failed to persist complaint");
            ApiError::internal("Failed to create complaint")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateComplaintResponse {
            ticket_id: record.ticket_id,
            category: record.category,
            language: record.language,
            created_at: record.created_at,
        }),
    ))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<ComplaintRecord>, ApiError> {
    match state.store.get(ticket_id.trim()).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::not_found("Ticket not found")),
        Err(err) => {
            error!(error = ?err, ticket_id = %ticket_id, "failed to load complaint");
            Err(ApiError::internal("Failed to load complaint"))
        }
    }
}
