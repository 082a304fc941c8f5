//src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod controllers;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta o router completo. `/api/health` e o OpenAPI ficam fora do guard.
pub fn build_router(app_state: AppState) -> Router {
    let financeiro_routes = Router::new()
        .route("/contratos", get(handlers::financeiro::list_contracts))
        .route("/contratos/{id}/pendencia", patch(handlers::financeiro::set_pendencia));

    let document_routes = Router::new()
        .route("/{id}/documentos/{kind}", get(handlers::documents::contract_document));

    let estoque_routes = Router::new()
        .route("/materiais"
               ,get(handlers::estoque::list_materials)
               .post(handlers::estoque::create_material)
        )
        .route("/materiais/resumo", get(handlers::estoque::model_summary))
        .route("/materiais/busca", get(handlers::estoque::search_materials))
        .route("/materiais/{id}"
               ,put(handlers::estoque::update_material)
               .delete(handlers::estoque::delete_material)
        )
        .route("/materiais/{id}/localizacao", get(handlers::estoque::current_location))
        .route("/materiais/{id}/historico", get(handlers::estoque::location_history))
        .route("/materiais/{id}/mover", post(handlers::estoque::move_material))
        .route("/modelos"
               ,get(handlers::estoque::list_models)
               .post(handlers::estoque::create_model)
        )
        .route("/modelos/por-tipo", get(handlers::estoque::models_for_type))
        .route("/modelos/{id}"
               ,put(handlers::estoque::update_model)
               .delete(handlers::estoque::delete_model)
        )
        .route("/veiculos", get(handlers::estoque::list_vehicles))
        .route("/contratos/busca", get(handlers::estoque::search_contracts));

    let agenda_routes = Router::new()
        .route("/eventos"
               ,get(handlers::agenda::list_events)
               .post(handlers::agenda::create_event)
        )
        .route("/eventos/{id}"
               ,get(handlers::agenda::get_event)
               .put(handlers::agenda::update_event)
        )
        .route("/eventos/{id}/datas", patch(handlers::agenda::update_event_dates))
        .route("/eventos/{id}/cliente", get(handlers::agenda::event_client))
        .route("/eventos/{id}/instalacao", post(handlers::agenda::submit_installation))
        .route("/contratos/busca", get(handlers::agenda::search_contracts))
        .route("/usuarios", get(handlers::agenda::list_team));

    // Tudo sob /api exige o Bearer do serviço de autenticação
    let protected = Router::new()
        .nest("/financeiro", financeiro_routes)
        .nest("/contratos", document_routes)
        .nest("/estoque", estoque_routes)
        .nest("/agenda", agenda_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", protected)
        .with_state(app_state)
}
