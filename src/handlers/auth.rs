// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{
        AdminKeyQuery, AuthResponse, CreateUserPayload, CreateUserResponse, CreatedUserSummary,
        MeResponse, SignInPayload, TokenPayload,
    },
};

// POST /api/auth/signin
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Auth",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn sign_in(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SignInPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (token, user) = app_state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(AuthResponse::bearer(token, user)))
}

// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado e autenticado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn sign_up(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (token, user) = app_state
        .auth_service
        .sign_up(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(AuthResponse::bearer(token, user))))
}

// POST /api/auth/create-user?key=...
#[utoipa::path(
    post,
    path = "/api/auth/create-user",
    tag = "Auth",
    request_body = CreateUserPayload,
    params(
        ("key" = String, Query, description = "Chave de administrador (ADMIN_API_KEY)")
    ),
    responses(
        (status = 201, description = "Usuário criado", body = CreateUserResponse),
        (status = 403, description = "Chave de administrador inválida"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<AdminKeyQuery>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .auth_service
        .create_user_with_admin_key(&query.key, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let response = CreateUserResponse {
        success: true,
        user: CreatedUserSummary {
            id: user.id,
            email: user.email,
            empresa: user.empresa,
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/auth/me
#[utoipa::path(
    post,
    path = "/api/auth/me",
    tag = "Auth",
    request_body = TokenPayload,
    responses(
        (status = 200, description = "Usuário dono do token", body = MeResponse),
        (status = 401, description = "Token inválido"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn me(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TokenPayload>,
) -> Result<Json<MeResponse>, ApiError> {
    let user = app_state
        .auth_service
        .validate_token(&payload.token)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(MeResponse { user: user.into() }))
}

// GET /api/auth/ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "pong": true }))
}
