// src/services/chat_service.rs

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{config::ChatConfig, models::chat::ChatMessage};

pub const FALLBACK_REPLY: &str = "IA indisponível no momento.";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct InferenceResponse {
    message: Option<InferenceMessage>,
}

#[derive(Deserialize)]
struct InferenceMessage {
    content: Option<String>,
}

/// Repassa a conversa para o endpoint de inferência (API de chat do Ollama).
#[derive(Clone)]
pub struct ChatService {
    client: Client,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(config: ChatConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Falha ao criar o cliente HTTP do chat")?;
        Ok(Self { client, config })
    }

    /// Nunca falha: qualquer problema no endpoint vira a resposta padrão.
    pub async fn reply(&self, message: &str, history: Vec<Value>) -> String {
        match self.ask(message, history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("❌ Erro ao consultar o modelo: {:#}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn ask(&self, message: &str, mut history: Vec<Value>) -> anyhow::Result<String> {
        history.push(serde_json::to_value(ChatMessage {
            role: "user".into(),
            content: message.to_string(),
        })?);
        let request = InferenceRequest {
            model: &self.config.model,
            messages: history,
            stream: false,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .context("Endpoint de inferência inacessível")?
            .error_for_status()
            .context("Endpoint de inferência respondeu com erro")?;

        let body: InferenceResponse = response.json().await.context("Resposta de inferência inválida")?;
        body.message
            .and_then(|m| m.content)
            .context("Resposta sem message.content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn config(url: String) -> ChatConfig {
        ChatConfig {
            url,
            model: "test-model".into(),
            timeout: Duration::from_secs(2),
        }
    }

    async fn spawn_endpoint(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/api/chat", addr)
    }

    #[tokio::test]
    async fn forwards_history_plus_new_turn() {
        // Ecoa o número de mensagens e o conteúdo da última
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                let messages = body["messages"].as_array().cloned().unwrap_or_default();
                let last = messages.last().map(|m| m["content"].clone()).unwrap_or_default();
                Json(json!({
                    "message": {
                        "role": "assistant",
                        "content": format!("{}|{}|{}|{}", body["model"], body["stream"], messages.len(), last)
                    }
                }))
            }),
        );
        let service = ChatService::new(config(spawn_endpoint(app).await)).unwrap();

        let history = vec![
            json!({ "role": "user", "content": "oi" }),
            json!({ "role": "assistant", "content": "olá!" }),
        ];
        let reply = service.reply("quanto custa?", history).await;
        assert_eq!(reply, r#""test-model"|false|3|"quanto custa?""#);
    }

    #[tokio::test]
    async fn history_entries_are_forwarded_untouched() {
        // Devolve a primeira mensagem do histórico como conteúdo
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "message": { "content": body["messages"][0].to_string() } }))
            }),
        );
        let service = ChatService::new(config(spawn_endpoint(app).await)).unwrap();

        let entry = json!({ "role": "user", "ts": 1700000000 });
        let reply = service.reply("oi", vec![entry.clone()]).await;
        assert_eq!(serde_json::from_str::<Value>(&reply).unwrap(), entry);
    }

    #[tokio::test]
    async fn malformed_answer_falls_back() {
        let app = Router::new().route("/api/chat", post(|| async { Json(json!({ "done": true })) }));
        let service = ChatService::new(config(spawn_endpoint(app).await)).unwrap();

        assert_eq!(service.reply("oi", Vec::new()).await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let service = ChatService::new(config("http://127.0.0.1:1/api/chat".into())).unwrap();
        assert_eq!(service.reply("oi", Vec::new()).await, FALLBACK_REPLY);
    }
}
