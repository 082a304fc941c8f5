// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Financeiro ---
        handlers::financeiro::list_contracts,
        handlers::financeiro::set_pendencia,

        // --- Documentos ---
        handlers::documents::contract_document,

        // --- Estoque ---
        handlers::estoque::list_materials,
        handlers::estoque::model_summary,
        handlers::estoque::create_material,
        handlers::estoque::update_material,
        handlers::estoque::delete_material,
        handlers::estoque::search_materials,
        handlers::estoque::current_location,
        handlers::estoque::location_history,
        handlers::estoque::move_material,
        handlers::estoque::list_vehicles,
        handlers::estoque::search_contracts,
        handlers::estoque::list_models,
        handlers::estoque::create_model,
        handlers::estoque::update_model,
        handlers::estoque::delete_model,
        handlers::estoque::models_for_type,

        // --- Agenda ---
        handlers::agenda::list_events,
        handlers::agenda::get_event,
        handlers::agenda::create_event,
        handlers::agenda::update_event,
        handlers::agenda::update_event_dates,
        handlers::agenda::event_client,
        handlers::agenda::submit_installation,
        handlers::agenda::search_contracts,
        handlers::agenda::list_team,
    ),
    components(
        schemas(
            // --- Contratos ---
            models::contract::ContractStatus,
            models::contract::Contract,
            models::contract::Client,
            models::contract::ContractListing,
            models::contract::ContractRef,
            handlers::financeiro::PendenciaPayload,

            // --- Documentos ---
            services::contract_templates::DocumentKind,
            services::document_service::PaperFormat,

            // --- Estoque ---
            models::inventory::MaterialTipo,
            models::inventory::LocationKind,
            models::inventory::LocationRecord,
            models::inventory::LocationDetail,
            models::inventory::Material,
            models::inventory::MaterialModel,
            models::inventory::Vehicle,
            models::inventory::MaterialOverview,
            models::inventory::ModelSummary,
            models::inventory::MaterialDraft,
            models::inventory::ModelDraft,
            models::inventory::MoveMaterialPayload,
            handlers::estoque::CurrentLocation,

            // --- Agenda ---
            models::agenda::AgendaEvent,
            models::agenda::EventDraft,
            models::agenda::EventDates,
            models::agenda::EventStyle,
            models::agenda::CalendarEvent,
            models::agenda::Installation,
            models::agenda::InstallationForm,
            models::agenda::EventClient,
            models::auth::TeamMember,
            models::auth::SessionContext,
        )
    ),
    tags(
        (name = "Financeiro", description = "Listagem de contratos e pendências"),
        (name = "Documentos", description = "Termos de adesão, permanência e rescisão"),
        (name = "Estoque", description = "Materiais, modelos e movimentações"),
        (name = "Agenda", description = "Eventos, agendamentos e instalações")
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
