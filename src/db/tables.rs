// src/db/tables.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    models::{
        agenda::{AgendaEvent, EventDraft, Installation, InstallationPlan},
        auth::TeamMember,
        contract::{Client, Contract, ContractDocumentData, ContractFilter, ContractListing, ContractRef, ContractStatus},
        inventory::{
            LocationDetail, LocationRecord, LocationTarget, Material, MaterialDraft, MaterialFilter,
            MaterialModel, ModelDraft, ModelFilter, ModelSummary, MaterialTipo, Vehicle,
        },
    },
};

// Acesso às tabelas do backend. Os serviços dependem destes traits, não do Postgres,
// para que os testes rodem sobre a implementação em memória.

#[async_trait]
pub trait ContractTable: Send + Sync {
    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, AppError>;

    async fn find_contract(&self, contract_id: i64) -> Result<Option<Contract>, AppError>;

    async fn find_contract_by_pppoe(&self, pppoe: &str) -> Result<Option<Contract>, AppError>;

    /// Busca por trecho do PPPoE (sem diferenciar maiúsculas), ordenada pelo PPPoE.
    async fn search_contracts(&self, term: &str, limit: i64) -> Result<Vec<ContractRef>, AppError>;

    async fn set_pendencia(&self, contract_id: i64, pendencia: bool) -> Result<Option<Contract>, AppError>;

    async fn set_status(
        &self,
        contract_id: i64,
        status: ContractStatus,
    ) -> Result<Option<Contract>, AppError>;

    async fn find_client(&self, client_id: i64) -> Result<Option<Client>, AppError>;

    async fn document_data(&self, contract_id: i64) -> Result<Option<ContractDocumentData>, AppError>;
}

#[async_trait]
pub trait InventoryTable: Send + Sync {
    async fn list_materials(
        &self,
        filter: &MaterialFilter,
        page: PageRequest,
    ) -> Result<Page<Material>, AppError>;

    async fn model_summary(&self) -> Result<Vec<ModelSummary>, AppError>;

    async fn find_material(&self, material_id: i64) -> Result<Option<Material>, AppError>;

    async fn search_materials(&self, serial: &str, limit: i64) -> Result<Vec<Material>, AppError>;

    async fn insert_material(&self, draft: &MaterialDraft) -> Result<Material, AppError>;

    async fn update_material(
        &self,
        material_id: i64,
        draft: &MaterialDraft,
    ) -> Result<Option<Material>, AppError>;

    async fn delete_material(&self, material_id: i64) -> Result<bool, AppError>;

    async fn list_models(
        &self,
        filter: &ModelFilter,
        page: PageRequest,
    ) -> Result<Page<MaterialModel>, AppError>;

    async fn all_models(&self) -> Result<Vec<MaterialModel>, AppError>;

    async fn find_models(&self, model_ids: &[i64]) -> Result<Vec<MaterialModel>, AppError>;

    /// Modelos usados por algum material do tipo.
    async fn models_used_by(&self, tipo: MaterialTipo) -> Result<Vec<MaterialModel>, AppError>;

    async fn insert_model(&self, draft: &ModelDraft) -> Result<MaterialModel, AppError>;

    async fn update_model(&self, model_id: i64, draft: &ModelDraft) -> Result<Option<MaterialModel>, AppError>;

    async fn delete_model(&self, model_id: i64) -> Result<bool, AppError>;

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError>;
}

#[async_trait]
pub trait LocationTable: Send + Sync {
    /// Registro mais recente (maior data; empate, maior id).
    async fn latest_location(&self, material_id: i64) -> Result<Option<LocationDetail>, AppError>;

    /// Registro mais recente de cada material da lista, numa consulta só.
    /// Materiais sem histórico ficam de fora.
    async fn latest_locations(&self, material_ids: &[i64]) -> Result<Vec<LocationDetail>, AppError>;

    async fn location_history(&self, material_id: i64) -> Result<Vec<LocationDetail>, AppError>;

    async fn insert_location(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<LocationRecord, AppError>;

    /// Insere apenas se o material ainda não tem nenhum registro.
    async fn insert_location_if_absent(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<Option<LocationRecord>, AppError>;
}

#[async_trait]
pub trait AgendaTable: Send + Sync {
    /// Eventos que se sobrepõem ao intervalo.
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AgendaEvent>, AppError>;

    async fn find_event(&self, event_id: i64) -> Result<Option<AgendaEvent>, AppError>;

    async fn insert_event(&self, draft: &EventDraft) -> Result<AgendaEvent, AppError>;

    async fn update_event(&self, event_id: i64, draft: &EventDraft) -> Result<Option<AgendaEvent>, AppError>;

    async fn update_event_dates(
        &self,
        event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<AgendaEvent>, AppError>;

    async fn list_team(&self) -> Result<Vec<TeamMember>, AppError>;
}

#[async_trait]
pub trait InstallationTable: Send + Sync {
    async fn find_installation(&self, event_id: i64) -> Result<Option<Installation>, AppError>;

    /// Aplica todas as escritas da conclusão de uma vez: ou tudo, ou nada.
    /// Se o evento já tem instalação, devolve a existente sem escrever.
    async fn complete_installation(&self, plan: &InstallationPlan) -> Result<Installation, AppError>;
}
