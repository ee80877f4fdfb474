// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{dashboard::DashboardData, modules::ClientWithModulesResponse},
};

// GET /api/dashboard/data
#[utoipa::path(
    get,
    path = "/api/dashboard/data",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dados do painel do cliente", body = DashboardData),
        (status = 404, description = "Nenhum cliente para o usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_data(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DashboardData>, ApiError> {
    let data = app_state
        .dashboard_service
        .dashboard_for_user(user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(data))
}

// GET /api/dashboard/client/{client_id}
#[utoipa::path(
    get,
    path = "/api/dashboard/client/{client_id}",
    tag = "Dashboard",
    params(("client_id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente e seus módulos", body = ClientWithModulesResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client_data(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<String>,
) -> Result<Json<ClientWithModulesResponse>, ApiError> {
    let client = app_state
        .client_repo
        .find_by_id(&client_id)
        .await
        .ok_or_else(|| AppError::ClientNotFound.to_api_error(&locale))?;
    let modules = app_state
        .module_repo
        .get_client_modules(&client_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ClientWithModulesResponse { client, modules }))
}
