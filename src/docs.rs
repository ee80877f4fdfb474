// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::sign_in,
        handlers::auth::sign_up,
        handlers::auth::create_user,
        handlers::auth::me,

        // --- Account ---
        handlers::account::get_profile,
        handlers::account::update_profile,
        handlers::account::change_password,
        handlers::account::upload_avatar,

        // --- Admin ---
        handlers::admin::stats,
        handlers::admin::list_users,
        handlers::admin::list_clients,
        handlers::admin::list_leads,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Modules ---
        handlers::modules::available,
        handlers::modules::my_modules,
        handlers::modules::client_modules,
        handlers::modules::set_modules,
        handlers::modules::enable_module,
        handlers::modules::disable_module,

        // --- Dashboard ---
        handlers::dashboard::get_data,
        handlers::dashboard::get_client_data,

        // --- Landing ---
        handlers::onboarding::submit,
        handlers::chat::chat,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserView,
            models::auth::SignInPayload,
            models::auth::CreateUserPayload,
            models::auth::TokenPayload,
            models::auth::AuthResponse,
            models::auth::CreatedUserSummary,
            models::auth::CreateUserResponse,
            models::auth::MeResponse,

            // --- Account ---
            models::account::UpdateProfilePayload,
            models::account::ChangePasswordPayload,
            models::account::PasswordChangedResponse,
            models::account::AvatarResponse,

            // --- Clients ---
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::DeleteClientResponse,

            // --- Modules ---
            models::modules::ModuleCatalogEntry,
            models::modules::ClientModules,
            models::modules::AvailableModulesResponse,
            models::modules::ClientModulesResponse,
            models::modules::ClientWithModulesResponse,

            // --- Dashboard ---
            models::dashboard::DashboardClient,
            models::dashboard::Kpis,
            models::dashboard::DashboardData,
            models::dashboard::AdminStats,

            // --- Landing ---
            models::onboarding::OnboardingLead,
            models::onboarding::OnboardingResponse,
            models::chat::ChatMessage,
            models::chat::ChatPayload,
            models::chat::ChatReply,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Cadastro"),
        (name = "Account", description = "Perfil do Usuário Logado"),
        (name = "Admin", description = "Visão Geral do Administrador"),
        (name = "Clients", description = "Cadastro de Clientes (Tenants)"),
        (name = "Modules", description = "Módulos Habilitados por Cliente"),
        (name = "Dashboard", description = "Dados do Painel do Cliente"),
        (name = "Onboarding", description = "Captação de Leads"),
        (name = "Chat", description = "Assistente da Landing Page")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/auth/signin",
            "/api/account/avatar",
            "/api/clients/{client_id}",
            "/api/modules/client/{client_id}/enable/{module_key}",
            "/api/dashboard/data",
            "/api/onboarding",
            "/api/chat",
        ] {
            assert!(paths.contains_key(path), "{} ausente do OpenAPI", path);
        }
        assert!(doc.components.unwrap().security_schemes.contains_key("api_jwt"));
    }
}
