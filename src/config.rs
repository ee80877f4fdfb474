// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use jsonwebtoken::Algorithm;

use crate::{
    db::{ClientRepository, JsonStore, ModuleRepository, OnboardingRepository, UserRepository},
    services::{
        account_service::AccountService, auth::AuthService, chat_service::ChatService,
        dashboard_service::DashboardService, document_service::DocumentService,
        email_service::EmailService, onboarding_service::OnboardingService,
    },
};

const DEV_SECRET: &str = "change_this_secret";

/// Credenciais e destino do envio de leads por e-mail.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub admin_email: String,
}

impl SmtpConfig {
    /// Só é possível enviar quando usuário e senha estão presentes.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

// Configuração imutável, montada uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_expiry_minutes: i64,
    pub bcrypt_cost: u32,
    pub admin_api_key: Option<String>,
    pub smtp: SmtpConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("⚠️ SECRET_KEY não definida, usando o segredo de desenvolvimento.");
            DEV_SECRET.to_string()
        });

        let jwt_algorithm = match optional_var("ALGORITHM") {
            Some(raw) => parse_hmac_algorithm(&raw)?,
            None => Algorithm::HS256,
        };

        let smtp_user = optional_var("SMTP_USER");
        let admin_email = optional_var("ADMIN_EMAIL")
            .or_else(|| smtp_user.clone())
            .unwrap_or_default();

        Ok(Self {
            bind_addr: parsed_var("BIND_ADDR", "0.0.0.0:8000")?,
            data_dir: optional_var("DATA_DIR").unwrap_or_else(|| "./data".into()).into(),
            uploads_dir: optional_var("UPLOADS_DIR").unwrap_or_else(|| "./uploads".into()).into(),
            fonts_dir: optional_var("FONTS_DIR").unwrap_or_else(|| "./fonts".into()).into(),
            jwt_secret,
            jwt_algorithm,
            token_expiry_minutes: token_expiry(parsed_var("ACCESS_TOKEN_EXPIRE_MINUTES", "60")?)?,
            bcrypt_cost: parsed_var("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
            admin_api_key: optional_var("ADMIN_API_KEY"),
            smtp: SmtpConfig {
                server: optional_var("SMTP_SERVER").unwrap_or_else(|| "smtp.gmail.com".into()),
                port: parsed_var("SMTP_PORT", "587")?,
                user: smtp_user,
                password: optional_var("SMTP_PASS"),
                admin_email,
            },
            chat: ChatConfig {
                url: optional_var("OLLAMA_URL")
                    .unwrap_or_else(|| "http://localhost:11434/api/chat".into()),
                model: optional_var("OLLAMA_MODEL").unwrap_or_else(|| "qwen2.5".into()),
                timeout: Duration::from_secs(8),
            },
        })
    }
}

/// Variáveis vazias contam como ausentes.
fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = optional_var(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .with_context(|| format!("{} inválida: '{}'", key, raw))
}

fn token_expiry(minutes: i64) -> anyhow::Result<i64> {
    if minutes < 1 {
        anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES deve ser ao menos 1 (recebido {})", minutes);
    }
    Ok(minutes)
}

fn parse_hmac_algorithm(raw: &str) -> anyhow::Result<Algorithm> {
    let algorithm = Algorithm::from_str(raw)
        .with_context(|| format!("ALGORITHM inválido: '{}'", raw))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => anyhow::bail!("ALGORITHM {:?} não é suportado (use HS256, HS384 ou HS512)", other),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub user_repo: UserRepository,
    pub client_repo: ClientRepository,
    pub module_repo: ModuleRepository,
    pub onboarding_repo: OnboardingRepository,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub dashboard_service: DashboardService,
    pub onboarding_service: OnboardingService,
    pub chat_service: ChatService,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        // --- Monta o gráfico de dependências ---
        let store = JsonStore::new(config.data_dir.clone());
        let user_repo = UserRepository::new(store.clone());
        let client_repo = ClientRepository::new(store.clone());
        let module_repo = ModuleRepository::new(store.clone());
        let onboarding_repo = OnboardingRepository::new(store);

        let auth_service = AuthService::new(user_repo.clone(), config.clone());
        let account_service =
            AccountService::new(user_repo.clone(), auth_service.clone(), config.uploads_dir.clone());
        let dashboard_service = DashboardService::new(client_repo.clone(), module_repo.clone());

        let document_service = DocumentService::new(config.fonts_dir.clone());
        let email_service = EmailService::new(config.smtp.clone());
        let onboarding_service =
            OnboardingService::new(onboarding_repo.clone(), document_service, email_service);

        let chat_service = ChatService::new(config.chat.clone())?;

        tracing::info!("✅ Armazenamento JSON em {}", config.data_dir.display());

        Ok(Self {
            config,
            user_repo,
            client_repo,
            module_repo,
            onboarding_repo,
            auth_service,
            account_service,
            dashboard_service,
            onboarding_service,
            chat_service,
        })
    }
}
