// src/models/client.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

// ---
// Client (o "Tenant")
// ---
// A organização cliente, com tema, permissões e configurações próprias
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Client {
    pub id: String,
    #[schema(example = "Padaria São João")]
    pub nome: String,
    pub email: String,
    #[schema(example = "alimentação")]
    pub segmento: String,
    #[schema(value_type = Object)]
    pub tema: Map<String, Value>,
    #[schema(value_type = Object)]
    pub permissoes: Map<String, Value>,
    #[schema(value_type = Object)]
    pub configuracoes: Map<String, Value>,
    pub created_at: Option<String>,
    // Campos adicionados por atualizações parciais
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[serde(default)]
    pub segmento: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub tema: Map<String, Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub permissoes: Map<String, Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub configuracoes: Map<String, Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteClientResponse {
    pub deleted: bool,
}
