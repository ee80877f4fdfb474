// src/db/onboarding_repo.rs

use serde_json::{Map, Value};

use crate::{common::error::AppError, db::JsonStore};

pub const ONBOARDING_FILE: &str = "onboarding.json";

// Lista de leads: só cresce, sem id e sem deduplicação
#[derive(Clone)]
pub struct OnboardingRepository {
    store: JsonStore,
}

impl OnboardingRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Grava o formulário exatamente como foi enviado.
    pub async fn append(&self, lead: Map<String, Value>) -> Result<(), AppError> {
        let doc = self.store.lock(ONBOARDING_FILE).await;
        let mut leads: Vec<Value> = doc.read().await.unwrap_or_default();
        leads.push(Value::Object(lead));
        doc.write(&leads).await
    }

    pub async fn list(&self) -> Vec<Value> {
        self.store.read(ONBOARDING_FILE).await.unwrap_or_default()
    }
}
