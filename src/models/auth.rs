// src/models/auth.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
    // Registros legados sem papel, ou com papel desconhecido, caem aqui.
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

// Representa um usuário como gravado em users.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub empresa: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    // avatar, bio, client_id e o que mais o perfil ganhar
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn client_id(&self) -> Option<&str> {
        self.extra
            .get("client_id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
    }
}

/// Visão pública do usuário: nunca carrega a senha.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: String,
    pub empresa: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        let mut extra = user.extra;
        extra.remove("password");
        extra.remove("senha");
        Self {
            id: user.id,
            empresa: user.empresa,
            email: user.email,
            role: user.role,
            name: user.name,
            created_at: user.created_at,
            extra,
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID do usuário)
    pub email: String,
    pub role: Role,
    pub iat: usize, // Issued At
    pub exp: usize, // Expiration time
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "contato@padaria.com")]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Usado tanto no cadastro público quanto no create-user do administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "A empresa é obrigatória."))]
    #[schema(example = "Padaria São João")]
    pub empresa: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminKeyQuery {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenPayload {
    pub token: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserView,
}

impl AuthResponse {
    pub fn bearer(access_token: String, user: User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: user.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserSummary {
    pub id: String,
    pub email: String,
    pub empresa: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: CreatedUserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_role_reads_as_user() {
        let user: User = serde_json::from_value(json!({
            "id": "1", "email": "a@b.com", "role": "superuser"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn roles_round_trip_in_lowercase() {
        for (raw, role) in [("user", Role::User), ("client", Role::Client), ("admin", Role::Admin)] {
            assert_eq!(serde_json::from_value::<Role>(json!(raw)).unwrap(), role);
            assert_eq!(serde_json::to_value(role).unwrap(), json!(raw));
        }
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn view_drops_password_and_keeps_extra_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "email": "a@b.com",
            "password": "$2b$hash",
            "role": "admin",
            "avatar": "/static/uploads/1/me.png"
        }))
        .unwrap();

        let view = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(view.get("password").is_none());
        assert_eq!(view["avatar"], "/static/uploads/1/me.png");
        assert_eq!(view["role"], "admin");
    }
}
