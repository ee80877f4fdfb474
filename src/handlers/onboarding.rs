// src/handlers/onboarding.rs

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::onboarding::{OnboardingLead, OnboardingResponse},
};

const SUCCESS_REDIRECT: &str = "/success";

// POST /api/onboarding
#[utoipa::path(
    post,
    path = "/api/onboarding",
    tag = "Onboarding",
    request_body = OnboardingLead,
    responses((status = 200, description = "Lead registrado", body = OnboardingResponse))
)]
pub async fn submit(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(submission): Json<Map<String, Value>>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    app_state
        .onboarding_service
        .submit(submission)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(OnboardingResponse {
        success: true,
        redirect: SUCCESS_REDIRECT.to_string(),
    }))
}
