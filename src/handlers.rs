use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::languages::{LanguageEntry, LANGUAGES};
use crate::state::AppState;
use crate::translate::{prompt, validation, RawTranslationRequest, TranslationResponse};

pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<RawTranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let Json(raw) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let request = validation::validate(raw, state.max_text_chars())?;
    info!(
        source_lang = %request.source_lang,
        target_lang = %request.target_lang,
        chars = request.text.chars().count(),
        "Translating"
    );

    let messages = prompt::build_messages(&request);
    let response = state.llm.chat_completion(messages).await?;

    let translated_text = response
        .first_content()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::NoTranslation)?
        .to_string();

    debug!("Translation returned {} chars", translated_text.chars().count());
    Ok(Json(TranslationResponse::Success { translated_text }))
}

/// Answers bare `OPTIONS` calls; real preflights are answered by the CORS layer
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn languages() -> Json<&'static [LanguageEntry]> {
    Json(&LANGUAGES[..])
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
