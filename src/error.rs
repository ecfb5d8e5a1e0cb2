use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::llm::UpstreamError;
use crate::translate::interface::TranslationResponse;

pub const SERVICE_ERROR: &str = "Translation service error. Please try again.";
pub const NO_TRANSLATION: &str = "No translation returned.";
pub const INTERNAL_ERROR: &str = "Internal server error.";

/// Everything the translate endpoint can answer with besides a translation.
///
/// Upstream and internal variants carry detail for the server log only; the
/// client always receives the fixed message for the variant.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request body is not a valid translation request: {0}")]
    InvalidBody(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("text exceeds {max} characters")]
    TextTooLong { max: usize },

    #[error("source and target languages are identical")]
    SameLanguage,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("upstream returned no content")]
    NoTranslation,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::MissingFields(_)
            | ApiError::TextTooLong { .. }
            | ApiError::SameLanguage => StatusCode::BAD_REQUEST,
            ApiError::Upstream(UpstreamError::Decode(_)) | ApiError::NoTranslation => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidBody(_) => "Invalid request body.".to_string(),
            ApiError::MissingFields(fields) => {
                format!("Missing required fields: {}", fields.join(", "))
            }
            ApiError::TextTooLong { max } => {
                format!("Text too long. Maximum {} characters.", max)
            }
            ApiError::SameLanguage => {
                "Source and target languages must be different.".to_string()
            }
            ApiError::Upstream(UpstreamError::Decode(_)) | ApiError::NoTranslation => {
                NO_TRANSLATION.to_string()
            }
            ApiError::Upstream(_) => SERVICE_ERROR.to_string(),
            ApiError::Internal(_) => INTERNAL_ERROR.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(UpstreamError::Status { status, body }) => {
                error!("Upstream error: status={} body={}", status, body);
            }
            ApiError::Upstream(e) => error!("Upstream error: {}", e),
            ApiError::NoTranslation => error!("Upstream returned no translation"),
            ApiError::Internal(e) => error!("Translation error: {:#}", e),
            other => warn!("Rejected translation request: {}", other),
        }

        let body = TranslationResponse::Failure {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
