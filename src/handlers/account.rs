// src/handlers/account.rs

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        account::{AvatarResponse, ChangePasswordPayload, PasswordChangedResponse, UpdateProfilePayload},
        auth::UserView,
    },
};

const AVATAR_FIELD: &str = "file";

// GET /api/account/me
#[utoipa::path(
    get,
    path = "/api/account/me",
    tag = "Account",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = UserView),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserView> {
    Json(user.into())
}

// PUT /api/account/update
#[utoipa::path(
    put,
    path = "/api/account/update",
    tag = "Account",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UserView),
        (status = 400, description = "Perfil não atualizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<UserView>, ApiError> {
    let updated = app_state
        .account_service
        .update_profile(&user.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(updated.into()))
}

// PUT /api/account/change-password
#[utoipa::path(
    put,
    path = "/api/account/change-password",
    tag = "Account",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada", body = PasswordChangedResponse),
        (status = 400, description = "Senha fraca")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<PasswordChangedResponse>, ApiError> {
    let success = app_state
        .account_service
        .change_password(&user.id, &payload.new_password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(PasswordChangedResponse { success }))
}

// POST /api/account/avatar (multipart, campo "file")
#[utoipa::path(
    post,
    path = "/api/account/avatar",
    tag = "Account",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Campo `file` com a imagem"),
    responses(
        (status = 200, description = "Avatar salvo", body = AvatarResponse),
        (status = 400, description = "Arquivo ausente ou formato não permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_avatar(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let upload_error = |e: axum::extract::multipart::MultipartError| {
        AppError::InvalidUpload(e.body_text()).to_api_error(&locale)
    };

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(upload_error)?;

        let avatar = app_state
            .account_service
            .save_avatar(&user.id, &file_name, &content)
            .await
            .map_err(|e| e.to_api_error(&locale))?;

        return Ok(Json(AvatarResponse { avatar }));
    }

    Err(AppError::MissingFile.to_api_error(&locale))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::{Request, StatusCode}};
    use serde_json::json;

    use crate::build_router;
    use crate::common::test_utils::{json_request, send, test_state, token_for};
    use crate::models::auth::Role;

    fn multipart_request(token: &str, file_name: &str, content: &str) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = file_name,
            c = content
        );
        Request::builder()
            .method("POST")
            .uri("/api/account/avatar")
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn account_routes_require_a_token() {
        let (state, _tmp) = test_state();
        let app = build_router(state);

        let (status, _) = send(&app, json_request("GET", "/api/account/me", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, json_request("GET", "/api/account/me", Some("abc"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_only_touches_allowed_fields() {
        let (state, _tmp) = test_state();
        let token = token_for(&state, "ana@x.com", Role::Client).await;
        let app = build_router(state);

        let body = json!({ "name": "Ana Maria", "bio": "Padeira", "role": "admin", "email": "x@y.com" });
        let (status, user) = send(&app, json_request("PUT", "/api/account/update", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["name"], "Ana Maria");
        assert_eq!(user["bio"], "Padeira");
        assert_eq!(user["role"], "client");
        assert_eq!(user["email"], "ana@x.com");
        assert!(user.get("password").is_none());
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (state, _tmp) = test_state();
        let token = token_for(&state, "ana@x.com", Role::Client).await;
        let app = build_router(state);

        let body = json!({ "new_password": "123" });
        let (status, body) =
            send(&app, json_request("PUT", "/api/account/change-password", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Senha deve ter 6+ caracteres.");
    }

    #[tokio::test]
    async fn avatar_upload_sets_public_path() {
        let (state, _tmp) = test_state();
        let token = token_for(&state, "ana@x.com", Role::Client).await;
        let app = build_router(state);

        let (status, body) = send(&app, multipart_request(&token, "eu.png", "PNGDATA")).await;
        assert_eq!(status, StatusCode::OK);
        let avatar = body["avatar"].as_str().unwrap();
        assert!(avatar.starts_with("/static/uploads/"));
        assert!(avatar.ends_with("/eu.png"));

        let (_, me) = send(&app, json_request("GET", "/api/account/me", Some(&token), None)).await;
        assert_eq!(me["avatar"], avatar);

        let (status, _) = send(&app, multipart_request(&token, "virus.exe", "MZ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
