//src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Sem configuração válida a aplicação não sobe
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;
    let app_state = AppState::new(config)?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Camadas aplicadas de baixo para cima: auth roda antes do admin
    let admin_only = |router: Router<AppState>| {
        router
            .layer(axum_middleware::from_fn(admin_guard))
            .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
    };
    let authenticated = |router: Router<AppState>| {
        router.layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
    };

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signin", post(handlers::auth::sign_in))
        .route("/signup", post(handlers::auth::sign_up))
        .route("/create-user", post(handlers::auth::create_user))
        .route("/me", post(handlers::auth::me))
        .route("/ping", get(handlers::auth::ping));

    let account_routes = authenticated(
        Router::new()
            .route("/me", get(handlers::account::get_profile))
            .route("/update", put(handlers::account::update_profile))
            .route("/change-password", put(handlers::account::change_password))
            .route("/avatar", post(handlers::account::upload_avatar)),
    );

    let admin_routes = admin_only(
        Router::new()
            .route("/stats", get(handlers::admin::stats))
            .route("/users", get(handlers::admin::list_users))
            .route("/clients", get(handlers::admin::list_clients))
            .route("/leads", get(handlers::admin::list_leads)),
    );

    let client_routes = admin_only(
        Router::new()
            .route(
                "/",
                post(handlers::clients::create_client).get(handlers::clients::list_clients),
            )
            .route(
                "/{client_id}",
                get(handlers::clients::get_client)
                    .put(handlers::clients::update_client)
                    .delete(handlers::clients::delete_client),
            ),
    );

    let module_routes = Router::new()
        .route("/available", get(handlers::modules::available))
        .merge(authenticated(
            Router::new().route("/me", get(handlers::modules::my_modules)),
        ))
        .merge(admin_only(
            Router::new()
                .route(
                    "/client/{client_id}",
                    get(handlers::modules::client_modules).put(handlers::modules::set_modules),
                )
                .route(
                    "/client/{client_id}/enable/{module_key}",
                    post(handlers::modules::enable_module),
                )
                .route(
                    "/client/{client_id}/disable/{module_key}",
                    post(handlers::modules::disable_module),
                ),
        ));

    let dashboard_routes = authenticated(
        Router::new().route("/data", get(handlers::dashboard::get_data)),
    )
    .merge(admin_only(
        Router::new().route("/client/{client_id}", get(handlers::dashboard::get_client_data)),
    ));

    let uploads = ServeDir::new(app_state.config.uploads_dir.clone());

    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/account", account_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/modules", module_routes)
        .nest("/api/dashboard", dashboard_routes)
        .route("/api/onboarding", post(handlers::onboarding::submit))
        .route("/api/chat", post(handlers::chat::chat))
        .nest_service("/static/uploads", uploads)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::build_router;
    use crate::common::test_utils::{json_request, send, test_state};

    #[tokio::test]
    async fn health_answers_on_both_paths() {
        let (state, _tmp) = test_state();
        let app = build_router(state);

        for uri in ["/health", "/api/health"] {
            let (status, body) = send(&app, json_request("GET", uri, None, None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");
        }
    }

    #[tokio::test]
    async fn ping_is_public() {
        let (state, _tmp) = test_state();
        let app = build_router(state);

        let (status, body) = send(&app, json_request("GET", "/api/auth/ping", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pong"], true);
    }
}
