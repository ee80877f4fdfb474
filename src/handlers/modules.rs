// src/handlers/modules.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::modules::{AvailableModulesResponse, ClientModulesResponse, ClientWithModulesResponse},
};

// GET /api/modules/available (público)
#[utoipa::path(
    get,
    path = "/api/modules/available",
    tag = "Modules",
    responses((status = 200, description = "Catálogo de módulos", body = AvailableModulesResponse))
)]
pub async fn available(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<AvailableModulesResponse>, ApiError> {
    let available = app_state
        .module_repo
        .list_available()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(AvailableModulesResponse { available }))
}

// GET /api/modules/me
#[utoipa::path(
    get,
    path = "/api/modules/me",
    tag = "Modules",
    responses(
        (status = 200, description = "Módulos do cliente do usuário", body = ClientModulesResponse),
        (status = 404, description = "Usuário sem cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_modules(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ClientModulesResponse>, ApiError> {
    let response = app_state
        .dashboard_service
        .modules_for_user(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(response))
}

// GET /api/modules/client/{client_id}
#[utoipa::path(
    get,
    path = "/api/modules/client/{client_id}",
    tag = "Modules",
    params(("client_id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente e seus módulos", body = ClientWithModulesResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn client_modules(
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

// PUT /api/modules/client/{client_id}  body: {"enabled": [...]}
#[utoipa::path(
    put,
    path = "/api/modules/client/{client_id}",
    tag = "Modules",
    params(("client_id" = String, Path, description = "ID do cliente")),
    request_body(content = Object, description = "{\"enabled\": [\"whatsapp\", ...]}"),
    responses(
        (status = 200, description = "Conjunto gravado", body = ClientModulesResponse),
        (status = 400, description = "enabled não é uma lista")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_modules(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ClientModulesResponse>, ApiError> {
    let enabled = enabled_keys(&payload).map_err(|e| e.to_api_error(&locale))?;

    let modules = app_state
        .module_repo
        .set_client_modules(&client_id, &enabled)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ClientModulesResponse { client_id, modules }))
}

// POST /api/modules/client/{client_id}/enable/{module_key}
#[utoipa::path(
    post,
    path = "/api/modules/client/{client_id}/enable/{module_key}",
    tag = "Modules",
    params(
        ("client_id" = String, Path, description = "ID do cliente"),
        ("module_key" = String, Path, description = "Chave do módulo")
    ),
    responses((status = 200, description = "Conjunto atualizado", body = ClientModulesResponse)),
    security(("api_jwt" = []))
)]
pub async fn enable_module(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, module_key)): Path<(String, String)>,
) -> Result<Json<ClientModulesResponse>, ApiError> {
    let modules = app_state
        .module_repo
        .enable_module(&client_id, &module_key)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ClientModulesResponse { client_id, modules }))
}

// POST /api/modules/client/{client_id}/disable/{module_key}
#[utoipa::path(
    post,
    path = "/api/modules/client/{client_id}/disable/{module_key}",
    tag = "Modules",
    params(
        ("client_id" = String, Path, description = "ID do cliente"),
        ("module_key" = String, Path, description = "Chave do módulo")
    ),
    responses((status = 200, description = "Conjunto atualizado", body = ClientModulesResponse)),
    security(("api_jwt" = []))
)]
pub async fn disable_module(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, module_key)): Path<(String, String)>,
) -> Result<Json<ClientModulesResponse>, ApiError> {
    let modules = app_state
        .module_repo
        .disable_module(&client_id, &module_key)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ClientModulesResponse { client_id, modules }))
}

// `enabled` ausente vale lista vazia; itens que não são texto são ignorados
fn enabled_keys(payload: &Value) -> Result<Vec<String>, AppError> {
    match payload.get("enabled") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()),
        Some(_) => Err(AppError::EnabledMustBeList),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::enabled_keys;
    use crate::build_router;
    use crate::common::error::AppError;
    use crate::common::test_utils::{json_request, send, test_state, token_for};
    use crate::models::auth::Role;

    #[test]
    fn enabled_must_be_a_list() {
        assert!(enabled_keys(&json!({})).unwrap().is_empty());
        assert_eq!(enabled_keys(&json!({ "enabled": ["a", 1] })).unwrap(), vec!["a"]);
        assert!(matches!(
            enabled_keys(&json!({ "enabled": "whatsapp" })),
            Err(AppError::EnabledMustBeList)
        ));
    }

    #[tokio::test]
    async fn catalog_is_public() {
        let (state, _tmp) = test_state();
        let app = build_router(state);

        let (status, body) = send(&app, json_request("GET", "/api/modules/available", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn admin_manages_client_modules() {
        let (state, _tmp) = test_state();
        let admin = token_for(&state, "admin@x.com", Role::Admin).await;
        let app = build_router(state);

        let uri = "/api/modules/client/c1";
        let (status, body) = send(
            &app,
            json_request("PUT", uri, Some(&admin), Some(json!({ "enabled": ["whatsapp", "bogus"] }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modules"]["enabled"], json!(["whatsapp"]));

        let (status, _) =
            send(&app, json_request("PUT", uri, Some(&admin), Some(json!({ "enabled": "whatsapp" })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let enable = "/api/modules/client/c1/enable/analytics";
        send(&app, json_request("POST", enable, Some(&admin), None)).await;
        let (_, body) = send(&app, json_request("POST", enable, Some(&admin), None)).await;
        assert_eq!(body["modules"]["enabled"], json!(["whatsapp", "analytics"]));

        let disable = "/api/modules/client/c1/disable/catalog";
        let (_, body) = send(&app, json_request("POST", disable, Some(&admin), None)).await;
        assert_eq!(body["modules"]["enabled"], json!(["whatsapp", "analytics"]));

        // Cliente inexistente no cadastro
        let (status, _) = send(&app, json_request("GET", uri, Some(&admin), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn my_modules_needs_a_resolvable_tenant() {
        let (state, _tmp) = test_state();
        let token = token_for(&state, "cliente@x.com", Role::Client).await;
        let app = build_router(state);

        let (status, body) = send(&app, json_request("GET", "/api/modules/me", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Cliente não encontrado para este usuário.");
    }
}
