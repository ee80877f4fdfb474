// src/db/module_repo.rs

use crate::{
    common::error::AppError,
    db::JsonStore,
    models::modules::{ClientModules, ModuleCatalogEntry, ModulesDocument},
};

pub const MODULES_FILE: &str = "modules.json";

/// Catálogo de módulos e o conjunto habilitado de cada cliente.
#[derive(Clone)]
pub struct ModuleRepository {
    store: JsonStore,
}

impl ModuleRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    // Na primeira leitura o documento semeado vai para o disco.
    async fn load(&self) -> Result<ModulesDocument, AppError> {
        if let Some(document) = self.store.read(MODULES_FILE).await {
            return Ok(document);
        }

        let doc = self.store.lock(MODULES_FILE).await;
        if !tokio::fs::try_exists(self.store.path_of(MODULES_FILE)).await? {
            let seeded = ModulesDocument::default();
            doc.write(&seeded).await?;
            return Ok(seeded);
        }
        // Arquivo presente mas inválido: usa o padrão sem sobrescrever.
        Ok(doc.read().await.unwrap_or_default())
    }

    pub async fn list_available(&self) -> Result<Vec<ModuleCatalogEntry>, AppError> {
        Ok(self.load().await?.available)
    }

    pub async fn get_client_modules(&self, client_id: &str) -> Result<ClientModules, AppError> {
        Ok(self
            .load()
            .await?
            .client_modules
            .remove(client_id)
            .unwrap_or_default())
    }

    /// Grava o conjunto habilitado. Chaves fora do catálogo são descartadas em silêncio.
    pub async fn set_client_modules(
        &self,
        client_id: &str,
        enabled_keys: &[String],
    ) -> Result<ClientModules, AppError> {
        self.modify(client_id, |_| enabled_keys.to_vec()).await
    }

    pub async fn enable_module(&self, client_id: &str, key: &str) -> Result<ClientModules, AppError> {
        self.modify(client_id, |mut enabled| {
            if !enabled.iter().any(|k| k == key) {
                enabled.push(key.to_string());
            }
            enabled
        })
        .await
    }

    pub async fn disable_module(&self, client_id: &str, key: &str) -> Result<ClientModules, AppError> {
        self.modify(client_id, |mut enabled| {
            enabled.retain(|k| k != key);
            enabled
        })
        .await
    }

    async fn modify<F>(&self, client_id: &str, change: F) -> Result<ClientModules, AppError>
    where
        F: FnOnce(Vec<String>) -> Vec<String>,
    {
        // Garante a semente antes de travar
        self.load().await?;

        let doc = self.store.lock(MODULES_FILE).await;
        let mut document: ModulesDocument = doc.read().await.unwrap_or_default();

        let current = document
            .client_modules
            .get(client_id)
            .map(|cfg| cfg.enabled.clone())
            .unwrap_or_default();

        let config = ClientModules {
            enabled: filter_against_catalog(&document.available, change(current)),
        };
        document
            .client_modules
            .insert(client_id.to_string(), config.clone());

        doc.write(&document).await?;
        Ok(config)
    }
}

/// Mantém só chaves do catálogo, na ordem recebida e sem repetição.
pub fn filter_against_catalog(catalog: &[ModuleCatalogEntry], keys: Vec<String>) -> Vec<String> {
    let mut enabled: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        let known = catalog.iter().any(|m| m.key == key);
        if known && !enabled.contains(&key) {
            enabled.push(key);
        }
    }
    enabled
}
