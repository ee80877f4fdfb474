// src/services/email_service.rs

use anyhow::Context;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{common::error::AppError, config::SmtpConfig, models::onboarding::OnboardingLead};

const LEAD_SUBJECT: &str = "Novo Lead - GhostAI";
const LEAD_ATTACHMENT: &str = "lead_ghostai.pdf";

#[derive(Clone)]
pub struct EmailService {
    smtp: SmtpConfig,
}

impl EmailService {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }

    pub fn is_configured(&self) -> bool {
        self.smtp.credentials().is_some()
    }

    /// Envia o lead para o administrador com o PDF anexado (STARTTLS).
    pub async fn send_lead(&self, lead: &OnboardingLead, pdf: Vec<u8>) -> Result<(), AppError> {
        let (user, password) = self
            .smtp
            .credentials()
            .context("Credenciais SMTP não configuradas")?;

        let from: Mailbox = user.parse().context("SMTP_USER não é um endereço válido")?;
        let to: Mailbox = self
            .smtp
            .admin_email
            .parse()
            .context("ADMIN_EMAIL não é um endereço válido")?;
        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| anyhow::anyhow!("Content-Type inválido: {}", e))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(LEAD_SUBJECT)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(lead_html(lead)))
                    .singlepart(Attachment::new(LEAD_ATTACHMENT.to_string()).body(pdf, pdf_type)),
            )
            .context("Falha ao montar o e-mail do lead")?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.server)
            .context("Falha ao preparar o transporte SMTP")?
            .port(self.smtp.port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        mailer.send(message).await.context("Falha no envio SMTP")?;

        tracing::info!("📧 E-mail do lead enviado para {}", self.smtp.admin_email);
        Ok(())
    }
}

fn lead_html(lead: &OnboardingLead) -> String {
    let field = |value: &Option<String>| escape_html(value.as_deref().unwrap_or("-"));
    format!(
        r#"<!DOCTYPE html><html lang="pt-BR"><head><meta charset="utf-8"></head><body>
<h2>Novo Lead Recebido</h2>
<p>Nome: {}</p>
<p>Email: {}</p>
<p>WhatsApp: {}</p>
<p>Empresa: {}</p>
</body></html>"#,
        field(&lead.nome),
        field(&lead.email),
        field(&lead.whatsapp),
        field(&lead.empresa),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
