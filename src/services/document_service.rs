// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};

use crate::{common::error::AppError, models::onboarding::OnboardingLead};

const LINE_WIDTH: usize = 90;
const EMPTY_VALUE: &str = "-";

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(fonts_dir: PathBuf) -> Self {
        Self { fonts_dir }
    }

    /// Gera o resumo do lead em PDF (A4), pronto para anexar ao e-mail.
    pub async fn render_lead_pdf(&self, lead: &OnboardingLead) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        let lead = lead.clone();

        // genpdf é síncrono; renderiza fora do runtime
        tokio::task::spawn_blocking(move || build_lead_pdf(&fonts_dir, &lead))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }
}

fn build_lead_pdf(fonts_dir: &std::path::Path, lead: &OnboardingLead) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None).map_err(|_| {
        AppError::FontNotFound(format!("Fonte Roboto não encontrada em {}", fonts_dir.display()))
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Novo Lead - GhostAI");
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(section_title("Informações Básicas"));
    doc.push(fields_table(&[
        ("Nome", text_or_dash(lead.nome.as_deref())),
        ("Email", text_or_dash(lead.email.as_deref())),
        ("WhatsApp", text_or_dash(lead.whatsapp.as_deref())),
        ("Empresa", text_or_dash(lead.empresa.as_deref())),
    ])?);
    doc.push(elements::Break::new(1.5));

    doc.push(section_title("Diagnóstico"));
    doc.push(fields_table(&[
        ("Segmento", text_or_dash(lead.segmento.as_deref())),
        ("Volume diário", text_or_dash(lead.volume.as_deref())),
        ("Canais", text_or_dash(Some(lead.canal.join(", ").as_str()))),
        ("Objetivos", text_or_dash(Some(lead.objetivo.join(", ").as_str()))),
    ])?);
    doc.push(elements::Break::new(1.5));

    doc.push(section_title("Descrição Geral"));
    doc.push(
        elements::Paragraph::new("Resumo do negócio:").styled(style::Style::new().bold().with_font_size(10)),
    );
    let descricao = match lead.descricao.as_deref() {
        None => "Não informado",
        Some(text) => text_or_dash(Some(text)),
    };
    for line in wrap_fixed_width(descricao, LINE_WIDTH) {
        doc.push(elements::Paragraph::new(line).styled(style::Style::new().with_font_size(10)));
    }

    // --- RODAPÉ ---
    doc.push(elements::Break::new(2));
    doc.push(
        elements::Paragraph::new("Gerado automaticamente pelo GhostAI")
            .styled(style::Style::new().italic().with_font_size(9)),
    );

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    Ok(buffer)
}

fn section_title(title: &str) -> elements::StyledElement<elements::Paragraph> {
    elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(14))
}

fn fields_table(rows: &[(&str, &str)]) -> Result<elements::TableLayout, AppError> {
    // Rótulo (1) e valor (3)
    let mut table = elements::TableLayout::new(vec![1, 3]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let label_style = style::Style::new().bold().with_font_size(10);
    for (label, value) in rows {
        table
            .row()
            .element(elements::Paragraph::new(format!("{}:", label)).styled(label_style))
            .element(elements::Paragraph::new(*value).styled(style::Style::new().with_font_size(10)))
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
    }
    Ok(table)
}

fn text_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => EMPTY_VALUE,
    }
}

/// Quebra o texto em pedaços de `width` caracteres, sem respeitar palavras.
pub fn wrap_fixed_width(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
