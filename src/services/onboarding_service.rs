// src/services/onboarding_service.rs

use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    db::OnboardingRepository,
    models::onboarding::OnboardingLead,
    services::{document_service::DocumentService, email_service::EmailService},
};

#[derive(Clone)]
pub struct OnboardingService {
    repo: OnboardingRepository,
    document_service: DocumentService,
    email_service: EmailService,
}

impl OnboardingService {
    pub fn new(
        repo: OnboardingRepository,
        document_service: DocumentService,
        email_service: EmailService,
    ) -> Self {
        Self { repo, document_service, email_service }
    }

    /// Grava o lead e avisa o administrador por e-mail.
    ///
    /// Só a gravação pode falhar a requisição: problemas no PDF ou no SMTP
    /// ficam no log.
    pub async fn submit(&self, submission: Map<String, Value>) -> Result<(), AppError> {
        let email = submission
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string();
        self.repo.append(submission.clone()).await?;
        tracing::info!("📝 Lead recebido: {}", email);

        if !self.email_service.is_configured() {
            tracing::warn!("⚠️ Envio de e-mail desativado (credenciais SMTP não configuradas).");
            return Ok(());
        }

        if let Err(e) = self.notify_admin(&submission).await {
            tracing::error!("❌ Falha ao enviar o lead por e-mail: {}", e);
        }
        Ok(())
    }

    async fn notify_admin(&self, submission: &Map<String, Value>) -> Result<(), AppError> {
        let lead = OnboardingLead::from_submission(submission)?;
        let pdf = self.document_service.render_lead_pdf(&lead).await?;
        self.email_service.send_lead(&lead, pdf).await
    }
}
