// src/handlers/financeiro.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::{
        error::ApiError,
        pagination::{Page, PageRequest, DEFAULT_ITEMS_PER_PAGE},
    },
    config::AppState,
    handlers::invalid_field,
    middleware::i18n::Locale,
    models::contract::{Contract, ContractFilter, ContractListing, ContractStatusFilter},
};

fn default_page() -> i64 {
    1
}

fn default_items_per_page() -> i64 {
    DEFAULT_ITEMS_PER_PAGE
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ContractListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i64,
    /// Trecho do PPPoE.
    pub search: Option<String>,
    /// Vazio = todos, `pendencia`, ou um status exato.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub asaas_only: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendenciaPayload {
    pub pendencia: bool,
}

#[utoipa::path(
    get,
    path = "/api/financeiro/contratos",
    tag = "Financeiro",
    params(ContractListQuery),
    responses(
        (status = 200, description = "Contratos paginados, mais recentes primeiro", body = Page<ContractListing>),
        (status = 400, description = "Filtro de status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ContractListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = ContractStatusFilter::parse(&query.status)
        .ok_or_else(|| invalid_field("status", "Filtro de status inválido.").to_api_error(&locale))?;

    let filter = ContractFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        status,
        asaas_only: query.asaas_only,
    };

    let page = app_state
        .contract_service
        .list_contracts(&filter, PageRequest::new(query.page, query.items_per_page))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(page))
}

#[utoipa::path(
    patch,
    path = "/api/financeiro/contratos/{id}/pendencia",
    tag = "Financeiro",
    request_body = PendenciaPayload,
    params(("id" = i64, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Pendência atualizada", body = Contract),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_pendencia(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(contract_id): Path<i64>,
    Json(payload): Json<PendenciaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let contract = app_state
        .contract_service
        .set_pendencia(contract_id, payload.pendencia)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(contract))
}
