// src/db/client_repo.rs

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::JsonStore,
    models::client::{Client, CreateClientPayload},
};

pub const CLIENTS_FILE: &str = "clients.json";

#[derive(Clone)]
pub struct ClientRepository {
    store: JsonStore,
}

impl ClientRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Client> {
        let raw: Vec<Value> = self.store.read(CLIENTS_FILE).await.unwrap_or_default();
        parse_clients(&raw)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Client> {
        self.list().await.into_iter().find(|c| c.id == id)
    }

    pub async fn create(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let doc = self.store.lock(CLIENTS_FILE).await;
        let mut clients: Vec<Value> = doc.read().await.unwrap_or_default();

        let client = Client {
            id: Uuid::new_v4().to_string(),
            nome: payload.nome,
            email: payload.email,
            segmento: payload.segmento,
            tema: payload.tema,
            permissoes: payload.permissoes,
            configuracoes: payload.configuracoes,
            created_at: Some(Utc::now().to_rfc3339()),
            extra: Map::new(),
        };

        clients.push(serde_json::to_value(&client)?);
        doc.write(&clients).await?;

        tracing::info!("🏢 Cliente '{}' criado ({})", client.nome, client.id);
        Ok(client)
    }

    /// Mescla rasa: cada chave de `updates` substitui a do registro; o `id` é preservado.
    pub async fn update(
        &self,
        id: &str,
        updates: Map<String, Value>,
    ) -> Result<Option<Client>, AppError> {
        let doc = self.store.lock(CLIENTS_FILE).await;
        let mut clients: Vec<Value> = doc.read().await.unwrap_or_default();

        let Some(record) = clients
            .iter_mut()
            .find(|c| c.get("id").and_then(Value::as_str) == Some(id))
            .and_then(Value::as_object_mut)
        else {
            return Ok(None);
        };

        for (key, value) in updates {
            if key != "id" {
                record.insert(key, value);
            }
        }
        let updated: Client = serde_json::from_value(Value::Object(record.clone()))
            .map_err(|e| AppError::InvalidFieldTypes(e.to_string()))?;

        doc.write(&clients).await?;
        Ok(Some(updated))
    }

    /// Remove o cliente. As configurações de módulos dele ficam órfãs.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let doc = self.store.lock(CLIENTS_FILE).await;
        let mut clients: Vec<Value> = doc.read().await.unwrap_or_default();

        let before = clients.len();
        clients.retain(|c| c.get("id").and_then(Value::as_str) != Some(id));
        if clients.len() == before {
            return Ok(false);
        }

        doc.write(&clients).await?;
        tracing::info!("🗑️ Cliente {} removido", id);
        Ok(true)
    }
}

fn parse_clients(raw: &[Value]) -> Vec<Client> {
    raw.iter()
        .filter_map(|c| match serde_json::from_value(c.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Registro de cliente ignorado: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn payload(nome: &str) -> CreateClientPayload {
        CreateClientPayload {
            nome: nome.into(),
            email: format!("{}@clientes.com", nome.to_lowercase()),
            segmento: "varejo".into(),
            tema: Map::new(),
            permissoes: Map::new(),
            configuracoes: Map::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let tmp = TempDir::new().unwrap();
        let repo = ClientRepository::new(JsonStore::new(tmp.path()));

        let client = repo.create(payload("Loja")).await.unwrap();
        assert!(!client.id.is_empty());
        assert!(client.created_at.is_some());
        assert_eq!(repo.find_by_id(&client.id).await.unwrap().nome, "Loja");
    }

    #[tokio::test]
    async fn update_is_a_shallow_merge() {
        let tmp = TempDir::new().unwrap();
        let repo = ClientRepository::new(JsonStore::new(tmp.path()));
        let client = repo.create(payload("Loja")).await.unwrap();

        let updates = json!({ "tema": { "cor": "#000" }, "plano": "pro", "id": "other" });
        let updated = repo
            .update(&client.id, updates.as_object().unwrap().clone())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, client.id);
        assert_eq!(updated.nome, "Loja");
        assert_eq!(updated.tema["cor"], "#000");
        assert_eq!(updated.extra["plano"], "pro");
        assert!(repo.update("missing", Map::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let tmp = TempDir::new().unwrap();
        let repo = ClientRepository::new(JsonStore::new(tmp.path()));
        let a = repo.create(payload("A")).await.unwrap();
        let b = repo.create(payload("B")).await.unwrap();

        assert!(!repo.delete("does-not-exist").await.unwrap());
        assert_eq!(repo.list().await.len(), 2);

        assert!(repo.delete(&a.id).await.unwrap());
        let remaining = repo.list().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[tokio::test]
    async fn concurrent_updates_leave_one_of_them_whole() {
        let tmp = TempDir::new().unwrap();
        let repo = ClientRepository::new(JsonStore::new(tmp.path()));
        let client = repo.create(payload("Loja")).await.unwrap();

        let first = json!({ "nome": "Primeira", "segmento": "um" });
        let second = json!({ "nome": "Segunda", "segmento": "dois" });

        let (r1, r2) = tokio::join!(
            repo.update(&client.id, first.as_object().unwrap().clone()),
            repo.update(&client.id, second.as_object().unwrap().clone()),
        );
        r1.unwrap();
        r2.unwrap();

        let stored = repo.find_by_id(&client.id).await.unwrap();
        let pair = (stored.nome.as_str(), stored.segmento.as_str());
        assert!(pair == ("Primeira", "um") || pair == ("Segunda", "dois"));
        assert_eq!(repo.list().await.len(), 1);
    }
}
