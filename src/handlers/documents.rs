// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::invalid_field,
    middleware::i18n::Locale,
    services::{
        contract_templates::DocumentKind,
        document_service::{DocumentService, ExportOptions, PaperFormat},
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Html,
    Pdf,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DocumentQuery {
    /// `html` (padrão) ou `pdf`.
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub format: DocumentFormat,
    #[param(value_type = Option<String>)]
    pub paper: Option<PaperFormat>,
    pub margin_mm: Option<f64>,
    pub font_size: Option<u8>,
}

impl DocumentQuery {
    fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            paper: self.paper.unwrap_or(defaults.paper),
            margin_mm: self.margin_mm.unwrap_or(defaults.margin_mm),
            font_size: self.font_size.unwrap_or(defaults.font_size),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/contratos/{id}/documentos/{kind}",
    tag = "Documentos",
    params(
        ("id" = i64, Path, description = "ID do contrato"),
        ("kind" = String, Path, description = "adesao, permanencia ou rescisao"),
        DocumentQuery
    ),
    responses(
        (status = 200, description = "Documento em HTML ou PDF"),
        (status = 400, description = "Tipo de documento ou opções inválidas"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn contract_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((contract_id, kind)): Path<(i64, String)>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, ApiError> {
    let kind = DocumentKind::parse(&kind)
        .ok_or_else(|| invalid_field("kind", "Tipo de documento inválido.").to_api_error(&locale))?;

    let data = app_state
        .contract_service
        .document_data(contract_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let document = app_state
        .document_service
        .generate(kind, &data, Local::now().date_naive());

    match query.format {
        DocumentFormat::Html => {
            let file_name = DocumentService::file_name(kind, data.pppoe.as_deref(), "html");
            let headers = [
                (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", file_name)),
            ];
            Ok((headers, document.to_html()).into_response())
        }
        DocumentFormat::Pdf => {
            let pdf_bytes = app_state
                .document_service
                .render_pdf(&document, &query.export_options())
                .map_err(|e| e.to_api_error(&locale))?;

            // Configura os headers para o navegador baixar o PDF
            let file_name = DocumentService::file_name(kind, data.pppoe.as_deref(), "pdf");
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
            ];
            Ok((headers, pdf_bytes).into_response())
        }
    }
}
