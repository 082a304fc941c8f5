// src/handlers/agenda.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::{estoque::PppoeQuery, invalid_field},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        agenda::{AgendaEvent, CalendarEvent, EventClient, EventDates, EventDraft, Installation, InstallationForm},
        auth::TeamMember,
        contract::ContractRef,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/agenda/eventos",
    tag = "Agenda",
    params(EventRangeQuery),
    responses(
        (status = 200, description = "Eventos que tocam o intervalo", body = Vec<CalendarEvent>),
        (status = 400, description = "Intervalo invertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(range): Query<EventRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if range.end < range.start {
        return Err(invalid_field("end", "A data final deve ser posterior à inicial.").to_api_error(&locale));
    }

    let events = app_state
        .agenda_service
        .events_between(range.start, range.end)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/agenda/eventos/{id}",
    tag = "Agenda",
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento", body = AgendaEvent),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = app_state
        .agenda_service
        .find_event(event_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(event))
}

#[utoipa::path(
    post,
    path = "/api/agenda/eventos",
    tag = "Agenda",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Evento criado; instalação com PPPoE agenda o contrato", body = AgendaEvent),
        (status = 400, description = "Nome ou datas ausentes"),
        (status = 404, description = "PPPoE sem contrato")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<EventDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let event = app_state
        .agenda_service
        .save_event(None, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/agenda/eventos/{id}",
    tag = "Agenda",
    request_body = EventDraft,
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento atualizado", body = AgendaEvent),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(event_id): Path<i64>,
    Json(payload): Json<EventDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let event = app_state
        .agenda_service
        .save_event(Some(event_id), payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(event))
}

#[utoipa::path(
    patch,
    path = "/api/agenda/eventos/{id}/datas",
    tag = "Agenda",
    request_body = EventDates,
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento remarcado", body = AgendaEvent),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event_dates(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(event_id): Path<i64>,
    Json(payload): Json<EventDates>,
) -> Result<impl IntoResponse, ApiError> {
    let event = app_state
        .agenda_service
        .update_dates(event_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(event))
}

#[utoipa::path(
    get,
    path = "/api/agenda/eventos/{id}/cliente",
    tag = "Agenda",
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Contrato e cliente do PPPoE do evento", body = EventClient),
        (status = 404, description = "Evento ou contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn event_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .agenda_service
        .event_client(event_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/agenda/eventos/{id}/instalacao",
    tag = "Agenda",
    request_body = InstallationForm,
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 201, description = "Instalação registrada (ou a já existente)", body = Installation),
        (status = 404, description = "Evento, contrato ou material não encontrado"),
        (status = 409, description = "Contrato cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_installation(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(event_id): Path<i64>,
    Json(payload): Json<InstallationForm>,
) -> Result<impl IntoResponse, ApiError> {
    let installation = app_state
        .installation_service
        .submit(event_id, payload, Some(&user.0))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(installation)))
}

#[utoipa::path(
    get,
    path = "/api/agenda/contratos/busca",
    tag = "Agenda",
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

#[utoipa::path(
    get,
    path = "/api/agenda/usuarios",
    tag = "Agenda",
    responses((status = 200, description = "Equipe para o campo de responsáveis", body = Vec<TeamMember>)),
    security(("api_jwt" = []))
)]
pub async fn list_team(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let team = app_state
        .agenda_service
        .list_team()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(team))
}
