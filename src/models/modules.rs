// src/models/modules.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::client::Client;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleCatalogEntry {
    #[schema(example = "whatsapp")]
    pub key: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientModules {
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Conteúdo de modules.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesDocument {
    #[serde(default = "default_catalog")]
    pub available: Vec<ModuleCatalogEntry>,
    #[serde(default)]
    pub client_modules: BTreeMap<String, ClientModules>,
}

impl Default for ModulesDocument {
    fn default() -> Self {
        Self {
            available: default_catalog(),
            client_modules: BTreeMap::new(),
        }
    }
}

pub fn default_catalog() -> Vec<ModuleCatalogEntry> {
    [
        ("whatsapp", "WhatsApp Automations", "Fluxos e envios via WhatsApp"),
        ("instagram", "Instagram DM", "Automação de DMs e comentários"),
        ("catalog", "Catálogo", "Gerenciar produtos"),
        ("promotions", "Promoções", "Cupons e campanhas"),
        ("analytics", "Analytics", "KPIs e relatórios"),
    ]
    .into_iter()
    .map(|(key, name, description)| ModuleCatalogEntry {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableModulesResponse {
    pub available: Vec<ModuleCatalogEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientModulesResponse {
    pub client_id: String,
    pub modules: ClientModules,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientWithModulesResponse {
    pub client: Client,
    pub modules: ClientModules,
}
