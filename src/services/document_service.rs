// src/services/document_service.rs

use chrono::NaiveDate;
use genpdf::{elements, style, Alignment, Element, Margins, PaperSize};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::DocumentSettings,
    models::contract::ContractDocumentData,
    services::contract_templates::{self, Block, ContractDocument, DocumentKind},
};

const FONT_FAMILY: &str = "Roboto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    Letter,
    A4,
}

impl From<PaperFormat> for PaperSize {
    fn from(format: PaperFormat) -> Self {
        match format {
            PaperFormat::Letter => PaperSize::Letter,
            PaperFormat::A4 => PaperSize::A4,
        }
    }
}

fn default_margin() -> f64 {
    25.4
}

fn default_font_size() -> u8 {
    10
}

/// Opções da exportação em PDF. O padrão é carta com margem de 1 polegada.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportOptions {
    #[serde(default)]
    pub paper: PaperFormat,
    #[serde(default = "default_margin")]
    #[validate(range(min = 0.0, max = 60.0, message = "A margem deve ficar entre 0 e 60 mm."))]
    pub margin_mm: f64,
    #[serde(default = "default_font_size")]
    #[validate(range(min = 6, max = 24, message = "O tamanho da fonte deve ficar entre 6 e 24."))]
    pub font_size: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            paper: PaperFormat::default(),
            margin_mm: default_margin(),
            font_size: default_font_size(),
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    settings: DocumentSettings,
}

impl DocumentService {
    pub fn new(settings: DocumentSettings) -> Self {
        Self { settings }
    }

    pub fn generate(&self, kind: DocumentKind, data: &ContractDocumentData, issued_on: NaiveDate) -> ContractDocument {
        contract_templates::generate(kind, data, &self.settings, issued_on)
    }

    pub fn file_name(kind: DocumentKind, pppoe: Option<&str>, extension: &str) -> String {
        let pppoe = pppoe.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("sem_pppoe");
        let safe: String = pppoe
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        format!("contrato_{}_{}.{}", kind.as_str(), safe, extension)
    }

    pub fn render_pdf(&self, document: &ContractDocument, options: &ExportOptions) -> Result<Vec<u8>, AppError> {
        options.validate()?;

        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.settings.fonts_dir, FONT_FAMILY, None).map_err(|e| {
            tracing::error!("Fonte {} não carregada de {}: {}", FONT_FAMILY, self.settings.fonts_dir, e);
            AppError::FontNotFound(format!("{} em {}", FONT_FAMILY, self.settings.fonts_dir))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(document.title.clone());
        doc.set_paper_size(PaperSize::from(options.paper));
        doc.set_font_size(options.font_size);
        doc.set_line_spacing(1.15);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(Margins::all(options.margin_mm));
        doc.set_page_decorator(decorator);

        let bold = style::Style::new().bold();
        let title_size = options.font_size.saturating_add(2);

        for block in &document.blocks {
            match block {
                Block::Title(text) => {
                    doc.push(
                        elements::Paragraph::new(text.as_str())
                            .aligned(Alignment::Center)
                            .styled(bold.with_font_size(title_size)),
                    );
                    doc.push(elements::Break::new(0.5));
                }
                Block::Subtitle(text) => {
                    doc.push(elements::Paragraph::new(text.as_str()).aligned(Alignment::Center));
                }
                Block::Heading(text) => {
                    doc.push(elements::Break::new(0.5));
                    doc.push(elements::Paragraph::new(text.as_str()).styled(bold));
                }
                Block::Paragraph(text) => {
                    doc.push(elements::Paragraph::new(text.as_str()));
                    doc.push(elements::Break::new(0.5));
                }
                Block::Clause { label, text } => {
                    let mut paragraph = elements::Paragraph::default();
                    paragraph.push_styled(format!("{} ", label), bold);
                    paragraph.push(text.as_str());
                    doc.push(paragraph);
                    doc.push(elements::Break::new(0.5));
                }
                Block::Lines(lines) => {
                    let mut layout = elements::LinearLayout::vertical();
                    for line in lines {
                        layout.push(elements::Paragraph::new(line.as_str()));
                    }
                    doc.push(layout);
                    doc.push(elements::Break::new(0.5));
                }
                Block::Centered(lines) => {
                    doc.push(elements::Break::new(1));
                    for line in lines {
                        doc.push(elements::Paragraph::new(line.as_str()).aligned(Alignment::Center));
                    }
                }
            }
        }

        // Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        tracing::info!("PDF '{}' gerado ({} bytes)", document.title, buffer.len());
        Ok(buffer)
    }
}
