// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppConfig,
    db::UserRepository,
    models::auth::{Claims, CreateUserPayload, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, config: Arc<AppConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Confere e-mail e senha. E-mail desconhecido e senha errada dão o mesmo erro.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        tracing::info!("🔑 Login de {}", user.email);
        Ok((token, user))
    }

    /// Cadastro público: cria o usuário e já devolve um token.
    pub async fn sign_up(&self, payload: CreateUserPayload) -> Result<(String, User), AppError> {
        let user = self.create_user(payload).await?;
        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Criação feita pelo administrador, protegida pela chave de API.
    pub async fn create_user_with_admin_key(
        &self,
        key: &str,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        // Sem chave configurada ninguém passa
        let expected = self
            .config
            .admin_api_key
            .as_deref()
            .ok_or(AppError::InvalidAdminKey)?;
        if key.trim() != expected {
            return Err(AppError::InvalidAdminKey);
        }
        self.create_user(payload).await
    }

    async fn create_user(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let hashed_password = self.hash_password(&payload.password).await?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            empresa: payload.empresa,
            email: payload.email,
            password: hashed_password,
            role: Role::Client,
            name: payload.name,
            created_at: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let user = self.user_repo.create(user).await?;
        tracing::info!("👤 Usuário {} criado", user.email);
        Ok(user)
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.config.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = password_hash.to_owned();

        // Executa a verificação em um thread separado
        let outcome = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?;

        // Hash corrompido ou vazio conta como senha errada
        Ok(outcome.unwrap_or(false))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(self.config.jwt_algorithm);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    /// Decodifica o token e resolve o usuário atual.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.config.token_expiry_minutes);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::new(self.config.jwt_algorithm),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?)
    }
}
