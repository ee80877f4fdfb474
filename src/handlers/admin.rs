// src/handlers/admin.rs

use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::{auth::UserView, client::Client, dashboard::AdminStats},
};

// GET /api/admin/stats
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Totais de usuários e clientes", body = AdminStats),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<AdminStats>, ApiError> {
    let users = app_state
        .user_repo
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let clients = app_state.client_repo.list().await;

    Ok(Json(AdminStats {
        total_users: users.len(),
        total_clients: clients.len(),
    }))
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "Todos os usuários, sem senha", body = Vec<UserView>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = app_state
        .user_repo
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

// GET /api/admin/clients
#[utoipa::path(
    get,
    path = "/api/admin/clients",
    tag = "Admin",
    responses(
        (status = 200, description = "Todos os clientes", body = Vec<Client>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(State(app_state): State<AppState>) -> Json<Vec<Client>> {
    Json(app_state.client_repo.list().await)
}

// GET /api/admin/leads
#[utoipa::path(
    get,
    path = "/api/admin/leads",
    tag = "Admin",
    responses(
        (status = 200, description = "Leads recebidos pelo onboarding, como foram gravados", body = Vec<Object>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(State(app_state): State<AppState>) -> Json<Vec<Value>> {
    Json(app_state.onboarding_repo.list().await)
}
