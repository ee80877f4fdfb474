// src/models/dashboard.rs

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::{
    auth::UserView,
    modules::{ClientModules, ModuleCatalogEntry},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardClient {
    pub id: String,
    pub nome: String,
    #[schema(value_type = Object)]
    pub tema: Map<String, Value>,
    #[schema(value_type = Object)]
    pub logo: Option<Value>,
}

// Ainda sem fonte de dados: sempre zerados
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct Kpis {
    pub leads_last_7_days: u64,
    pub conversions_last_7_days: u64,
    pub open_chats: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardData {
    pub client: DashboardClient,
    pub modules: ClientModules,
    pub available_modules: Vec<ModuleCatalogEntry>,
    pub user: UserView,
    pub kpis: Kpis,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_clients: usize,
}
