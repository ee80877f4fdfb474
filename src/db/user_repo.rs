// src/db/user_repo.rs

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{common::error::AppError, db::JsonStore, models::auth::User};

pub const USERS_FILE: &str = "users.json";

// O repositório de usuários, responsável por todas as interações com users.json
#[derive(Clone)]
pub struct UserRepository {
    store: JsonStore,
}

impl UserRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Lista todos os usuários, já no formato atual.
    ///
    /// Registros legados (sem `id`) são convertidos e, se houver algum,
    /// a coleção inteira é regravada na hora.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let doc = self.store.lock(USERS_FILE).await;
        let raw: Vec<Value> = doc.read().await.unwrap_or_default();

        let migrated = raw.iter().filter(|u| is_legacy(u)).count();
        let normalized: Vec<Value> = raw.into_iter().map(normalize_legacy_user).collect();

        if migrated > 0 {
            tracing::warn!("🔧 Migrando {} usuário(s) legado(s) para o formato atual.", migrated);
            doc.write(&normalized).await?;
        }

        Ok(normalized.into_iter().filter_map(parse_user).collect())
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|u| normalize_email(&u.email) == email))
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }

    /// Grava um novo usuário. O hash da senha já deve vir pronto.
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        // Garante que legados sejam migrados antes de travar o documento
        self.list().await?;

        let doc = self.store.lock(USERS_FILE).await;
        let mut users: Vec<Value> = doc.read().await.unwrap_or_default();

        user.email = normalize_email(&user.email);
        let taken = users
            .iter()
            .filter_map(|u| u.get("email").and_then(Value::as_str))
            .any(|email| normalize_email(email) == user.email);
        if taken {
            return Err(AppError::EmailAlreadyExists);
        }
        if user.id.is_empty() {
            user.id = Uuid::new_v4().to_string();
        }

        users.push(serde_json::to_value(&user)?);
        doc.write(&users).await?;
        Ok(user)
    }

    /// Mescla `updates` no registro. `id` e `password` não mudam por aqui.
    pub async fn update(
        &self,
        id: &str,
        updates: Map<String, Value>,
    ) -> Result<Option<User>, AppError> {
        self.list().await?;

        let doc = self.store.lock(USERS_FILE).await;
        let mut users: Vec<Value> = doc.read().await.unwrap_or_default();

        let Some(record) = users
            .iter_mut()
            .find(|u| u.get("id").and_then(Value::as_str) == Some(id))
            .and_then(Value::as_object_mut)
        else {
            return Ok(None);
        };

        for (key, value) in updates {
            if key == "id" || key == "password" {
                continue;
            }
            record.insert(key, value);
        }
        let updated = parse_user(Value::Object(record.clone()));

        doc.write(&users).await?;
        Ok(updated)
    }

    /// Troca o hash da senha; `false` quando o usuário não existe.
    pub async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool, AppError> {
        self.list().await?;

        let doc = self.store.lock(USERS_FILE).await;
        let mut users: Vec<Value> = doc.read().await.unwrap_or_default();

        let Some(record) = users
            .iter_mut()
            .find(|u| u.get("id").and_then(Value::as_str) == Some(id))
            .and_then(Value::as_object_mut)
        else {
            return Ok(false);
        };

        record.insert("password".into(), Value::String(password_hash.to_string()));
        doc.write(&users).await?;
        Ok(true)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_legacy(record: &Value) -> bool {
    record.as_object().is_some_and(|u| !u.contains_key("id"))
}

fn parse_user(record: Value) -> Option<User> {
    match serde_json::from_value(record) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Registro de usuário ignorado: {}", e);
            None
        }
    }
}

fn text_field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Formato antigo: `{empresa|company, email, senha, role?}` sem `id`.
fn normalize_legacy_user(record: Value) -> Value {
    let Some(old) = record.as_object() else {
        return record;
    };
    if old.contains_key("id") {
        return record;
    }

    let id = text_field(old, "email")
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    serde_json::json!({
        "id": id,
        "empresa": text_field(old, "empresa").or(text_field(old, "company")).unwrap_or(""),
        "email": text_field(old, "email").unwrap_or(""),
        "password": text_field(old, "senha").or(text_field(old, "password")).unwrap_or(""),
        "role": text_field(old, "role").unwrap_or("user"),
        "name": text_field(old, "name").unwrap_or(""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use serde_json::json;
    use tempfile::TempDir;

    fn repo(tmp: &TempDir) -> UserRepository {
        UserRepository::new(JsonStore::new(tmp.path()))
    }

    fn new_user(email: &str) -> User {
        User {
            empresa: "Acme".into(),
            email: email.into(),
            password: "$2b$04$hash".into(),
            role: Role::Client,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn legacy_records_are_migrated_and_persisted() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(USERS_FILE),
            json!([
                { "company": "Old Co", "email": "old@co.com", "senha": "$2b$legacy" },
                { "id": "u-1", "empresa": "New", "email": "new@co.com", "password": "$2b$x", "role": "admin", "name": "N" }
            ])
            .to_string(),
        )
        .unwrap();

        let users = repo(&tmp).list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "old@co.com");
        assert_eq!(users[0].empresa, "Old Co");
        assert_eq!(users[0].password, "$2b$legacy");
        assert_eq!(users[0].role, Role::User);
        assert_eq!(users[1].role, Role::Admin);

        let on_disk: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join(USERS_FILE)).unwrap())
                .unwrap();
        assert!(on_disk.iter().all(|u| u.get("id").is_some()));
        assert!(on_disk[0].get("senha").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let tmp = TempDir::new().unwrap();
        let repo = repo(&tmp);

        repo.create(new_user("dup@acme.com")).await.unwrap();
        let err = repo.create(new_user(" DUP@acme.com ")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_fields_but_protects_id_and_password() {
        let tmp = TempDir::new().unwrap();
        let repo = repo(&tmp);
        let user = repo.create(new_user("a@acme.com")).await.unwrap();

        let mut updates = Map::new();
        updates.insert("name".into(), json!("Alice"));
        updates.insert("bio".into(), json!("Padeira"));
        updates.insert("password".into(), json!("plain"));
        updates.insert("id".into(), json!("hijack"));

        let updated = repo.update(&user.id, updates).await.unwrap().unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.password, user.password);
        assert_eq!(updated.extra["bio"], "Padeira");

        assert!(repo.update("missing", Map::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_password_hash_reports_missing_user() {
        let tmp = TempDir::new().unwrap();
        let repo = repo(&tmp);
        let user = repo.create(new_user("b@acme.com")).await.unwrap();

        assert!(repo.set_password_hash(&user.id, "$2b$new").await.unwrap());
        assert!(!repo.set_password_hash("nobody", "$2b$new").await.unwrap());
        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.password, "$2b$new");
    }
}
