// src/models/chat.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    #[schema(example = "user")]
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: Option<String>,
    // Repassado ao modelo como veio, inclusive campos extras.
    #[serde(default)]
    #[schema(value_type = Vec<ChatMessage>)]
    pub history: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
}
