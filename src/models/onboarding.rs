// src/models/onboarding.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Formulário de onboarding enviado pela landing page.
///
/// O lead é gravado como chegou; esta visão só alimenta o PDF e o e-mail.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct OnboardingLead {
    #[serde(deserialize_with = "loose_text")]
    pub nome: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub whatsapp: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub empresa: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub segmento: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub volume: Option<String>,
    // O formulário manda listas; o chat da landing manda texto livre.
    #[serde(deserialize_with = "string_or_list")]
    pub canal: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub objetivo: Vec<String>,
    #[serde(deserialize_with = "loose_text")]
    pub descricao: Option<String>,
}

impl OnboardingLead {
    pub fn from_submission(raw: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(raw.clone()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardingResponse {
    pub success: bool,
    pub redirect: String,
}

fn value_as_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_text(Value::deserialize(deserializer)?))
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_as_text).collect(),
        other => value_as_text(other).into_iter().collect::<Vec<_>>(),
    };
    Ok(items.into_iter().filter(|s| !s.trim().is_empty()).collect())
}
