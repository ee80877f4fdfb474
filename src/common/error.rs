use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Chave de administrador inválida")]
    InvalidAdminKey,

    #[error("Acesso restrito a administradores")]
    AdminOnly,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Nenhum cliente vinculado ao usuário")]
    ClientForUserNotFound,

    #[error("Nenhum cliente cadastrado")]
    NoClientsRegistered,

    #[error("Senha fraca")]
    WeakPassword,

    #[error("Perfil não atualizado")]
    ProfileNotUpdated,

    #[error("Formato de arquivo não permitido")]
    FileTypeNotAllowed,

    #[error("Arquivo ausente")]
    MissingFile,

    #[error("Upload inválido: {0}")]
    InvalidUpload(String),

    #[error("Campos com tipo inválido: {0}")]
    InvalidFieldTypes(String),

    #[error("Lista de módulos inválida")]
    EnabledMustBeList,

    #[error("Mensagem obrigatória")]
    MessageRequired,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    JsonError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo de erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::WeakPassword
            | AppError::ProfileNotUpdated
            | AppError::FileTypeNotAllowed
            | AppError::MissingFile
            | AppError::InvalidUpload(_)
            | AppError::InvalidFieldTypes(_)
            | AppError::EnabledMustBeList
            | AppError::MessageRequired => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidAdminKey | AppError::AdminOnly => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::ClientNotFound
            | AppError::ClientForUserNotFound
            | AppError::NoClientsRegistered => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::FontNotFound(_)
            | AppError::IoError(_)
            | AppError::JsonError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta pública, no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        let english = locale.is_english();

        if let AppError::ValidationError(errors) = self {
            let mut details = serde_json::Map::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), json!(messages));
            }
            let error = if english {
                "One or more fields are invalid."
            } else {
                "Um ou mais campos são inválidos."
            };
            return ApiError {
                status,
                error: error.to_string(),
                details: Some(Value::Object(details)),
            };
        }

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` guarda o detalhe; o cliente só recebe a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let error = match self {
            AppError::InvalidUpload(reason) => {
                let prefix = if english { "Invalid upload" } else { "Upload inválido" };
                format!("{}: {}", prefix, reason)
            }
            AppError::InvalidFieldTypes(reason) => {
                let prefix = if english { "Invalid field types" } else { "Campos com tipo inválido" };
                format!("{}: {}", prefix, reason)
            }
            _ => self.message(english).to_string(),
        };

        ApiError { status, error, details: None }
    }

    fn message(&self, english: bool) -> &'static str {
        let (pt, en) = match self {
            AppError::EmailAlreadyExists => ("Este e-mail já está em uso.", "This e-mail is already in use."),
            AppError::InvalidCredentials => ("E-mail ou senha inválidos.", "Invalid e-mail or password."),
            AppError::InvalidToken => (
                "Token de autenticação inválido ou ausente.",
                "Authentication token is invalid or missing.",
            ),
            AppError::InvalidAdminKey => ("Chave de administrador inválida.", "Invalid admin key."),
            AppError::AdminOnly => ("Acesso apenas para administradores.", "Administrators only."),
            AppError::UserNotFound => ("Usuário não encontrado.", "User not found."),
            AppError::ClientNotFound => ("Cliente não encontrado.", "Client not found."),
            AppError::ClientForUserNotFound => (
                "Cliente não encontrado para este usuário.",
                "No client found for this user.",
            ),
            AppError::NoClientsRegistered => ("Nenhum cliente cadastrado.", "No clients registered."),
            AppError::WeakPassword => (
                "Senha deve ter 6+ caracteres.",
                "Password must have at least 6 characters.",
            ),
            AppError::ProfileNotUpdated => (
                "Não foi possível atualizar o perfil.",
                "The profile could not be updated.",
            ),
            AppError::FileTypeNotAllowed => ("Formato não permitido.", "File type not allowed."),
            AppError::MissingFile => ("Nenhum arquivo enviado.", "No file was sent."),
            AppError::EnabledMustBeList => ("enabled deve ser uma lista.", "enabled must be a list."),
            AppError::MessageRequired => ("Mensagem é obrigatória.", "A message is required."),
            _ => ("Ocorreu um erro inesperado.", "An unexpected error occurred."),
        };
        if english { en } else { pt }
    }
}

// Quando não há `Locale` disponível (ex.: middleware), responde no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
