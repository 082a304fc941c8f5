// src/handlers/estoque.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::{
        error::ApiError,
        pagination::{Page, PageRequest, DEFAULT_ITEMS_PER_PAGE},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        contract::ContractRef,
        inventory::{
            LocationDetail, LocationRecord, Material, MaterialDraft, MaterialFilter, MaterialModel,
            MaterialOverview, MaterialTipo, ModelDraft, ModelFilter, ModelSummary, MoveMaterialPayload, Vehicle,
        },
    },
};

fn default_page() -> i64 {
    1
}

fn default_items_per_page() -> i64 {
    DEFAULT_ITEMS_PER_PAGE
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---
// Queries
// ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MaterialListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i64,
    /// Sem modelo selecionado a lista vem vazia (use o resumo).
    pub id_modelo: Option<i64>,
    pub serial: Option<String>,
    pub tipo: Option<MaterialTipo>,
    pub etiqueta: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ModelListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i64,
    pub nome: Option<String>,
    pub marca: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SerialQuery {
    #[serde(default)]
    pub serial: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TipoQuery {
    pub tipo: Option<MaterialTipo>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PppoeQuery {
    #[serde(default)]
    pub pppoe: String,
}

/// Localização exibida no diálogo de movimentação.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLocation {
    pub localizacao: LocationDetail,
    pub label: String,
}

// ---
// Materiais
// ---

#[utoipa::path(
    get,
    path = "/api/estoque/materiais",
    tag = "Estoque",
    params(MaterialListQuery),
    responses((status = 200, description = "Materiais do modelo com a localização atual", body = Page<MaterialOverview>)),
    security(("api_jwt" = []))
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<MaterialListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(query.page, query.items_per_page);
    let Some(id_modelo) = query.id_modelo else {
        return Ok(Json(Page::<MaterialOverview>::empty(request)));
    };

    let filter = MaterialFilter {
        id_modelo,
        serial: non_blank(query.serial),
        tipo: query.tipo,
        etiqueta: non_blank(query.etiqueta),
    };

    let page = app_state
        .inventory_service
        .list_materials(&filter, request)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/estoque/materiais/resumo",
    tag = "Estoque",
    responses((status = 200, description = "Quantidade de materiais por modelo", body = Vec<ModelSummary>)),
    security(("api_jwt" = []))
)]
pub async fn model_summary(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .inventory_service
        .model_summary()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/estoque/materiais",
    tag = "Estoque",
    request_body = MaterialDraft,
    responses(
        (status = 201, description = "Material cadastrado na empresa", body = Material),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<MaterialDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .inventory_service
        .create_material(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    put,
    path = "/api/estoque/materiais/{id}",
    tag = "Estoque",
    request_body = MaterialDraft,
    params(("id" = i64, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Material atualizado", body = Material),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(material_id): Path<i64>,
    Json(payload): Json<MaterialDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .inventory_service
        .update_material(material_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(material))
}

#[utoipa::path(
    delete,
    path = "/api/estoque/materiais/{id}",
    tag = "Estoque",
    params(("id" = i64, Path, description = "ID do material")),
    responses(
        (status = 204, description = "Material excluído"),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(material_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_material(material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/estoque/materiais/busca",
    tag = "Estoque",
    params(SerialQuery),
    responses((status = 200, description = "Até 10 materiais pelo número de série", body = Vec<Material>)),
    security(("api_jwt" = []))
)]
pub async fn search_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SerialQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = app_state
        .inventory_service
        .search_by_serial(&query.serial)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(materials))
}

// ---
// Localização
// ---

#[utoipa::path(
    get,
    path = "/api/estoque/materiais/{id}/localizacao",
    tag = "Estoque",
    params(("id" = i64, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Localização atual", body = CurrentLocation),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn current_location(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(material_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let localizacao = app_state
        .inventory_service
        .resolve_current_location(material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let label = localizacao.label();
    Ok(Json(CurrentLocation { localizacao, label }))
}

#[utoipa::path(
    get,
    path = "/api/estoque/materiais/{id}/historico",
    tag = "Estoque",
    params(("id" = i64, Path, description = "ID do material")),
    responses((status = 200, description = "Movimentações, mais recentes primeiro", body = Vec<LocationDetail>)),
    security(("api_jwt" = []))
)]
pub async fn location_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(material_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .inventory_service
        .location_history(material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(history))
}

#[utoipa::path(
    post,
    path = "/api/estoque/materiais/{id}/mover",
    tag = "Estoque",
    request_body = MoveMaterialPayload,
    params(("id" = i64, Path, description = "ID do material")),
    responses(
        (status = 201, description = "Movimentação registrada", body = LocationRecord),
        (status = 400, description = "Destino incompleto"),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_material(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(material_id): Path<i64>,
    Json(payload): Json<MoveMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let target = payload.target().map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .inventory_service
        .move_material(material_id, target)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/estoque/veiculos",
    tag = "Estoque",
    responses((status = 200, description = "Veículos da frota", body = Vec<Vehicle>)),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = app_state
        .inventory_service
        .list_vehicles()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(vehicles))
}

#[utoipa::path(
    get,
    path = "/api/estoque/contratos/busca",
    tag = "Estoque",
    params(PppoeQuery),
    responses((status = 200, description = "Até 10 contratos pelo PPPoE", body = Vec<ContractRef>)),
    security(("api_jwt" = []))
)]
pub async fn search_contracts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PppoeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let contracts = app_state
        .contract_service
        .search_by_pppoe(&query.pppoe)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(contracts))
}

// ---
// Modelos
// ---

#[utoipa::path(
    get,
    path = "/api/estoque/modelos",
    tag = "Estoque",
    params(ModelListQuery),
    responses((status = 200, description = "Modelos ordenados pelo nome", body = Page<MaterialModel>)),
    security(("api_jwt" = []))
)]
pub async fn list_models(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ModelListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ModelFilter {
        nome: non_blank(query.nome),
        marca: non_blank(query.marca),
    };

    let page = app_state
        .inventory_service
        .list_models(&filter, PageRequest::new(query.page, query.items_per_page))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/estoque/modelos",
    tag = "Estoque",
    request_body = ModelDraft,
    responses(
        (status = 201, description = "Modelo criado", body = MaterialModel),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_model(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ModelDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let model = app_state
        .inventory_service
        .create_model(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(model)))
}

#[utoipa::path(
    put,
    path = "/api/estoque/modelos/{id}",
    tag = "Estoque",
    request_body = ModelDraft,
    params(("id" = i64, Path, description = "ID do modelo")),
    responses(
        (status = 200, description = "Modelo atualizado", body = MaterialModel),
        (status = 404, description = "Modelo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_model(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(model_id): Path<i64>,
    Json(payload): Json<ModelDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let model = app_state
        .inventory_service
        .update_model(model_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(model))
}

#[utoipa::path(
    delete,
    path = "/api/estoque/modelos/{id}",
    tag = "Estoque",
    params(("id" = i64, Path, description = "ID do modelo")),
    responses(
        (status = 204, description = "Modelo excluído"),
        (status = 404, description = "Modelo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_model(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(model_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_model(model_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/estoque/modelos/por-tipo",
    tag = "Estoque",
    params(TipoQuery),
    responses((status = 200, description = "Modelos usados por materiais do tipo", body = Vec<MaterialModel>)),
    security(("api_jwt" = []))
)]
pub async fn models_for_type(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TipoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let models = app_state
        .inventory_service
        .models_for_type(query.tipo)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(models))
}
