// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::{ClientRepository, ModuleRepository},
    models::{
        auth::User,
        client::Client,
        dashboard::{DashboardClient, DashboardData, Kpis},
        modules::ClientModulesResponse,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    client_repo: ClientRepository,
    module_repo: ModuleRepository,
}

impl DashboardService {
    pub fn new(client_repo: ClientRepository, module_repo: ModuleRepository) -> Self {
        Self { client_repo, module_repo }
    }

    /// Descobre o cliente (tenant) de um usuário.
    ///
    /// Usa `client_id` quando presente; senão procura um cliente cujo `nome`
    /// ou `email` coincida com a `empresa` do usuário.
    pub async fn resolve_client_id(&self, user: &User) -> Option<String> {
        if let Some(client_id) = user.client_id() {
            return Some(client_id.to_string());
        }

        let empresa = user.empresa.trim().to_lowercase();
        if empresa.is_empty() {
            return None;
        }

        self.client_repo
            .list()
            .await
            .into_iter()
            .find(|c| c.nome.trim().to_lowercase() == empresa || c.email.trim().to_lowercase() == empresa)
            .map(|c| c.id)
    }

    pub async fn modules_for_user(&self, user: &User) -> Result<ClientModulesResponse, AppError> {
        let client_id = self
            .resolve_client_id(user)
            .await
            .ok_or(AppError::ClientForUserNotFound)?;
        let modules = self.module_repo.get_client_modules(&client_id).await?;
        Ok(ClientModulesResponse { client_id, modules })
    }

    pub async fn dashboard_for_user(&self, user: User) -> Result<DashboardData, AppError> {
        let client_id = match self.resolve_client_id(&user).await {
            Some(id) => id,
            // Administrador sem tenant vê o primeiro cliente cadastrado
            None if user.role.is_admin() => self
                .client_repo
                .list()
                .await
                .into_iter()
                .next()
                .map(|c| c.id)
                .ok_or(AppError::NoClientsRegistered)?,
            None => return Err(AppError::ClientForUserNotFound),
        };

        let client = self
            .client_repo
            .find_by_id(&client_id)
            .await
            .ok_or(AppError::ClientNotFound)?;

        Ok(DashboardData {
            client: summarize(client),
            modules: self.module_repo.get_client_modules(&client_id).await?,
            available_modules: self.module_repo.list_available().await?,
            user: user.into(),
            kpis: Kpis::default(),
        })
    }
}

fn summarize(client: Client) -> DashboardClient {
    let logo = client.tema.get("logo").cloned();
    DashboardClient {
        id: client.id,
        nome: client.nome,
        tema: client.tema,
        logo,
    }
}
