// src/handlers/chat.rs

use axum::{extract::State, Json};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::chat::{ChatPayload, ChatReply},
};

// POST /api/chat
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Chat",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Resposta do modelo (ou a resposta padrão)", body = ChatReply),
        (status = 400, description = "Mensagem ausente")
    )
)]
pub async fn chat(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatReply>, ApiError> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::MessageRequired.to_api_error(&locale))?;

    let reply = app_state.chat_service.reply(&message, payload.history).await;
    Ok(Json(ChatReply { reply }))
}
