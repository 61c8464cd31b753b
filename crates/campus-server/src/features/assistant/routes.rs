//! Assistant API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/assistant/ask` - Ask the study assistant a question

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::response::{ApiResponse, AppError};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

use super::AssistantError;

/// Creates the assistant router
pub fn assistant_routes() -> Router<FeatureState> {
    Router::new().route("/ask", post(ask))
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

#[tracing::instrument(skip(state, request), fields(user_id = %user.id))]
async fn ask(
    State(state): State<FeatureState>,
    user: AuthUser,
    Json(request): Json<AskRequest>,
) -> Result<Response, AppError> {
    let answer = state.assistant.ask(&request.question).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "answer": answer }))),
    )
        .into_response())
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::QuestionRequired => AppError::Validation(err.to_string()),
            AssistantError::NotConfigured => {
                AppError::Internal("Assistant is not configured".to_string())
            }
            // Log the upstream detail; the client gets a generic failure
            AssistantError::Upstream(detail) => {
                tracing::warn!(error = %detail, "Assistant upstream failure");
                AppError::Internal("The assistant is currently unavailable".to_string())
            }
        }
    }
}
