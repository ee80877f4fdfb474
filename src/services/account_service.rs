// src/services/account_service.rs

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{account::UpdateProfilePayload, auth::User},
    services::auth::AuthService,
};

const ALLOWED_AVATAR_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "svg"];
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    auth_service: AuthService,
    uploads_dir: PathBuf,
}

impl AccountService {
    pub fn new(user_repo: UserRepository, auth_service: AuthService, uploads_dir: PathBuf) -> Self {
        Self { user_repo, auth_service, uploads_dir }
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        payload: UpdateProfilePayload,
    ) -> Result<User, AppError> {
        let mut updates = Map::new();
        for (key, value) in [("name", payload.name), ("empresa", payload.empresa), ("bio", payload.bio)] {
            if let Some(value) = value {
                updates.insert(key.to_string(), Value::String(value));
            }
        }

        self.user_repo
            .update(user_id, updates)
            .await?
            .ok_or(AppError::ProfileNotUpdated)
    }

    pub async fn change_password(&self, user_id: &str, new_password: &str) -> Result<bool, AppError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::WeakPassword);
        }
        let hashed = self.auth_service.hash_password(new_password).await?;
        self.user_repo.set_password_hash(user_id, &hashed).await
    }

    /// Grava o avatar em `<uploads>/<user_id>/<arquivo>` e devolve o caminho público.
    pub async fn save_avatar(
        &self,
        user_id: &str,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, AppError> {
        let file_name = sanitize_file_name(original_name);
        if !is_allowed_avatar(&file_name) {
            return Err(AppError::FileTypeNotAllowed);
        }

        let dir_name = sanitize_file_name(user_id);
        let user_dir = self.uploads_dir.join(&dir_name);
        tokio::fs::create_dir_all(&user_dir).await?;
        tokio::fs::write(user_dir.join(&file_name), content).await?;

        let public_path = format!("/static/uploads/{}/{}", dir_name, file_name);

        let mut updates = Map::new();
        updates.insert("avatar".into(), Value::String(public_path.clone()));
        self.user_repo.update(user_id, updates).await?;

        tracing::info!("🖼️ Avatar de {} salvo em {}", user_id, public_path);
        Ok(public_path)
    }
}

/// Reduz o nome a `[A-Za-z0-9._-]`, sem diretórios e sem ponto inicial.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

pub fn is_allowed_avatar(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && ALLOWED_AVATAR_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::test_state;
    use crate::models::auth::CreateUserPayload;

    #[test]
    fn file_names_are_sanitised() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("minha foto.PNG"), "minha_foto.PNG");
        assert_eq!(sanitize_file_name("..\\evil.png"), "evil.png");
        assert_eq!(sanitize_file_name(".hidden.jpg"), "hidden.jpg");
    }

    #[test]
    fn only_image_extensions_are_allowed() {
        assert!(is_allowed_avatar("me.png"));
        assert!(is_allowed_avatar("me.JPEG"));
        assert!(!is_allowed_avatar("me.exe"));
        assert!(!is_allowed_avatar("png"));
        assert!(!is_allowed_avatar(".png"));
    }

    async fn signed_up(state: &crate::config::AppState) -> User {
        let payload = CreateUserPayload {
            empresa: "Padaria".into(),
            email: "ana@padaria.com".into(),
            password: "segredo123".into(),
            name: "Ana".into(),
        };
        state.auth_service.sign_up(payload).await.unwrap().1
    }

    #[tokio::test]
    async fn change_password_rehashes_and_allows_new_login() {
        let (state, _tmp) = test_state();
        let user = signed_up(&state).await;

        let weak = state.account_service.change_password(&user.id, "123").await.unwrap_err();
        assert!(matches!(weak, AppError::WeakPassword));

        assert!(state.account_service.change_password(&user.id, "novasenha").await.unwrap());
        assert!(state.auth_service.sign_in("ana@padaria.com", "novasenha").await.is_ok());
        assert!(state.auth_service.sign_in("ana@padaria.com", "segredo123").await.is_err());
    }

    #[tokio::test]
    async fn avatar_is_written_and_linked_to_the_user() {
        let (state, tmp) = test_state();
        let user = signed_up(&state).await;

        let path = state
            .account_service
            .save_avatar(&user.id, "foto perfil.png", b"\x89PNG")
            .await
            .unwrap();
        assert_eq!(path, format!("/static/uploads/{}/foto_perfil.png", user.id));
        assert!(tmp.path().join("uploads").join(&user.id).join("foto_perfil.png").exists());

        let stored = state.user_repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.extra["avatar"], path);
    }

    #[tokio::test]
    async fn avatar_with_bad_extension_is_refused() {
        let (state, _tmp) = test_state();
        let user = signed_up(&state).await;

        let err = state
            .account_service
            .save_avatar(&user.id, "script.sh", b"#!/bin/sh")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FileTypeNotAllowed));
    }
}
