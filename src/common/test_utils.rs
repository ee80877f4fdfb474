// src/common/test_utils.rs

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{AppConfig, AppState, ChatConfig, SmtpConfig};

pub const ADMIN_KEY: &str = "test-admin-key";

pub fn test_config(tmp: &TempDir) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: tmp.path().join("data"),
        uploads_dir: tmp.path().join("uploads"),
        fonts_dir: tmp.path().join("fonts"),
        jwt_secret: "test-secret".into(),
        jwt_algorithm: jsonwebtoken::Algorithm::HS256,
        token_expiry_minutes: 60,
        bcrypt_cost: 4,
        admin_api_key: Some(ADMIN_KEY.into()),
        smtp: SmtpConfig {
            server: "localhost".into(),
            port: 2525,
            user: None,
            password: None,
            admin_email: "admin@example.com".into(),
        },
        chat: ChatConfig {
            // Porta fechada: qualquer chamada falha na hora
            url: "http://127.0.0.1:1/api/chat".into(),
            model: "test-model".into(),
            timeout: Duration::from_secs(2),
        },
    }
}

pub fn test_state() -> (AppState, TempDir) {
    test_state_with(|_| {})
}

pub fn test_state_with(customize: impl FnOnce(&mut AppConfig)) -> (AppState, TempDir) {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(&tmp);
    customize(&mut config);
    (AppState::new(config).unwrap(), tmp)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    builder.body(body).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Cria um usuário direto no repositório e devolve o token dele.
pub async fn token_for(state: &AppState, email: &str, role: crate::models::auth::Role) -> String {
    let payload = crate::models::auth::CreateUserPayload {
        empresa: "Padaria São João".into(),
        email: email.into(),
        password: "segredo123".into(),
        name: "Teste".into(),
    };
    let (_, user) = state.auth_service.sign_up(payload).await.unwrap();

    let mut updates = serde_json::Map::new();
    updates.insert("role".into(), serde_json::to_value(role).unwrap());
    let user = state.user_repo.update(&user.id, updates).await.unwrap().unwrap();

    state.auth_service.create_token(&user).unwrap()
}
