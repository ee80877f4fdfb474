// src/handlers/clients.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::client::{Client, CreateClientPayload, DeleteClientResponse},
};

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateClientPayload>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let client = app_state
        .client_repo
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses((status = 200, description = "Lista de clientes", body = Vec<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(State(app_state): State<AppState>) -> Json<Vec<Client>> {
    Json(app_state.client_repo.list().await)
}

// GET /api/clients/{client_id}
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    app_state
        .client_repo
        .find_by_id(&client_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::ClientNotFound.to_api_error(&locale))
}

// PUT /api/clients/{client_id}
// Corpo livre: mesclado raso sobre o registro
#[utoipa::path(
    put,
    path = "/api/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = String, Path, description = "ID do cliente")),
    request_body(content = Object, description = "Campos a substituir"),
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<String>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Json<Client>, ApiError> {
    app_state
        .client_repo
        .update(&client_id, updates)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .map(Json)
        .ok_or_else(|| AppError::ClientNotFound.to_api_error(&locale))
}

// DELETE /api/clients/{client_id}
#[utoipa::path(
    delete,
    path = "/api/clients/{client_id}",
    tag = "Clients",
    params(("client_id" = String, Path, description = "ID do cliente")),
    responses((status = 200, description = "Resultado da remoção", body = DeleteClientResponse)),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<String>,
) -> Result<Json<DeleteClientResponse>, ApiError> {
    let deleted = app_state
        .client_repo
        .delete(&client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(DeleteClientResponse { deleted }))
}
