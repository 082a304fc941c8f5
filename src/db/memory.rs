// src/db/memory.rs

// Implementação em memória das tabelas, usada pelos testes dos serviços,
// controladores e rotas.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::tables::{AgendaTable, ContractTable, InstallationTable, InventoryTable, LocationTable},
    models::{
        agenda::{AgendaEvent, EventDraft, Installation, InstallationPlan},
        auth::TeamMember,
        contract::{Client, Contract, ContractDocumentData, ContractFilter, ContractListing, ContractRef, ContractStatus},
        inventory::{
            LocationDetail, LocationRecord, LocationTarget, Material, MaterialDraft, MaterialFilter,
            MaterialModel, MaterialTipo, ModelDraft, ModelFilter, ModelSummary, Vehicle,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PlanRow {
    pub id: i64,
    pub nome: String,
    pub valor: Decimal,
}

#[derive(Debug, Clone)]
pub struct NeighbourhoodRow {
    pub id: i64,
    pub nome: String,
    pub cidade: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub clients: Vec<Client>,
    pub contracts: Vec<Contract>,
    pub plans: Vec<PlanRow>,
    pub neighbourhoods: Vec<NeighbourhoodRow>,
    pub materials: Vec<Material>,
    pub models: Vec<MaterialModel>,
    pub vehicles: Vec<Vehicle>,
    pub locations: Vec<LocationRecord>,
    pub events: Vec<AgendaEvent>,
    pub installations: Vec<Installation>,
    pub team: Vec<TeamMember>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn detail(&self, record: &LocationRecord) -> LocationDetail {
        LocationDetail {
            record: record.clone(),
            veiculo_placa: record
                .veiculo_id
                .and_then(|id| self.vehicles.iter().find(|v| v.id == id))
                .map(|v| v.placa.clone()),
            contrato_pppoe: record
                .contrato_id
                .and_then(|id| self.contracts.iter().find(|c| c.id == id))
                .and_then(|c| c.pppoe.clone()),
        }
    }

    // Mais recente primeiro; empate de data, maior id primeiro.
    fn history(&self, material_id: i64) -> Vec<LocationDetail> {
        let mut records: Vec<&LocationRecord> =
            self.locations.iter().filter(|l| l.material_id == material_id).collect();
        records.sort_by(|a, b| {
            b.data_atualizacao
                .cmp(&a.data_atualizacao)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.into_iter().map(|r| self.detail(r)).collect()
    }

    fn push_location(&mut self, material_id: i64, target: LocationTarget, at: DateTime<Utc>) -> LocationRecord {
        let record = LocationRecord {
            id: self.next_id(),
            material_id,
            localizacao_tipo: target.kind(),
            veiculo_id: target.veiculo_id(),
            contrato_id: target.contrato_id(),
            empresa: target.is_empresa(),
            data_atualizacao: at,
        };
        self.locations.push(record.clone());
        record
    }
}

fn contains(haystack: Option<&str>, term: Option<&str>) -> bool {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        None => true,
        Some(term) => haystack
            .map(|h| h.to_lowercase().contains(&term.to_lowercase()))
            .unwrap_or(false),
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    pub state: Mutex<MemoryState>,
    fail_installation_insert: AtomicBool,
    location_lookups: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faz a próxima conclusão de instalação falhar no INSERT da instalação.
    pub fn fail_installation_insert(&self) {
        self.fail_installation_insert.store(true, Ordering::SeqCst);
    }

    /// Quantas consultas de localização atual foram feitas.
    pub fn location_lookups(&self) -> usize {
        self.location_lookups.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn add_client(&self, nome: &str, cpf_cnpj: Option<&str>, idasaas: Option<&str>) -> Client {
        let mut state = self.state.lock().await;
        let client = Client {
            id: state.next_id(),
            nome: nome.to_string(),
            cpf_cnpj: cpf_cnpj.map(str::to_string),
            rg: None,
            email: None,
            fonewhats: None,
            cep: None,
            status: None,
            idasaas: idasaas.map(str::to_string),
        };
        state.clients.push(client.clone());
        client
    }

    pub async fn add_plan(&self, nome: &str, valor: Decimal) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.plans.push(PlanRow { id, nome: nome.to_string(), valor });
        id
    }

    pub async fn add_neighbourhood(&self, nome: &str, cidade: &str) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.neighbourhoods.push(NeighbourhoodRow {
            id,
            nome: nome.to_string(),
            cidade: cidade.to_string(),
        });
        id
    }

    pub async fn add_contract(
        &self,
        client_id: Option<i64>,
        pppoe: Option<&str>,
        status: Option<ContractStatus>,
        pendencia: bool,
    ) -> Contract {
        let mut state = self.state.lock().await;
        let contract = Contract {
            id: state.next_id(),
            created_at: Utc::now(),
            status,
            pendencia,
            endereco: None,
            complemento: None,
            id_plano: None,
            id_bairro: None,
            pppoe: pppoe.map(str::to_string),
            data_instalacao: None,
            dia_vencimento: None,
            id_legado: None,
            id_cliente: client_id,
            id_material: None,
        };
        state.contracts.push(contract.clone());
        contract
    }

    pub async fn update_contract(&self, contract_id: i64, f: impl FnOnce(&mut Contract)) {
        let mut state = self.state.lock().await;
        if let Some(contract) = state.contracts.iter_mut().find(|c| c.id == contract_id) {
            f(contract);
        }
    }

    pub async fn update_client(&self, client_id: i64, f: impl FnOnce(&mut Client)) {
        let mut state = self.state.lock().await;
        if let Some(client) = state.clients.iter_mut().find(|c| c.id == client_id) {
            f(client);
        }
    }

    pub async fn add_vehicle(&self, placa: &str) -> Vehicle {
        let mut state = self.state.lock().await;
        let vehicle = Vehicle {
            id: state.next_id(),
            placa: placa.to_string(),
            nome: None,
        };
        state.vehicles.push(vehicle.clone());
        vehicle
    }

    /// Material sem histórico de localização (dado legado).
    pub async fn add_material(&self, serialnb: &str, tipo: MaterialTipo, id_modelo: Option<i64>) -> Material {
        let mut state = self.state.lock().await;
        let material = Material {
            id: state.next_id(),
            serialnb: serialnb.to_string(),
            tipo,
            id_modelo,
            etiqueta: None,
            observacoes: None,
            created_at: Utc::now(),
        };
        state.materials.push(material.clone());
        material
    }

    pub async fn add_location_at(
        &self,
        material_id: i64,
        target: LocationTarget,
        at: DateTime<Utc>,
    ) -> LocationRecord {
        self.state.lock().await.push_location(material_id, target, at)
    }

    pub async fn add_event(&self, nome: &str, tipo_evento: Option<&str>, pppoe: Option<&str>) -> AgendaEvent {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let event = AgendaEvent {
            id: state.next_id(),
            nome: nome.to_string(),
            descricao: None,
            datainicio: now,
            datafinal: now + chrono::Duration::hours(1),
            tipo_evento: tipo_evento.map(str::to_string),
            responsaveis: Vec::new(),
            horamarcada: true,
            prioritario: false,
            realizada: false,
            parcial: true,
            cancelado: false,
            pppoe: pppoe.map(str::to_string),
            cor: None,
        };
        state.events.push(event.clone());
        event
    }

    pub async fn add_team_member(&self, nome: &str) -> TeamMember {
        let member = TeamMember { id: Uuid::new_v4(), nome: nome.to_string() };
        self.state.lock().await.team.push(member.clone());
        member
    }
}

#[async_trait]
impl ContractTable for MemoryBackend {
    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, AppError> {
        let state = self.state.lock().await;
        let mut rows: Vec<ContractListing> = state
            .contracts
            .iter()
            .filter_map(|c| {
                // INNER JOIN com clientes.
                let client = state.clients.iter().find(|cl| Some(cl.id) == c.id_cliente)?;
                Some((c, client))
            })
            .filter(|(c, _)| contains(c.pppoe.as_deref(), filter.search.as_deref()))
            .filter(|(c, _)| filter.status.matches(c.status, c.pendencia))
            .filter(|(_, cl)| !filter.asaas_only || cl.idasaas.is_some())
            .map(|(c, cl)| ContractListing {
                id: c.id,
                created_at: c.created_at,
                pppoe: c.pppoe.clone(),
                status: c.status,
                pendencia: c.pendencia,
                id_legado: c.id_legado.clone(),
                dia_vencimento: c.dia_vencimento,
                id_cliente: cl.id,
                cliente_nome: cl.nome.clone(),
                idasaas: cl.idasaas.clone(),
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(Page::slice(rows, page))
    }

    async fn find_contract(&self, contract_id: i64) -> Result<Option<Contract>, AppError> {
        let state = self.state.lock().await;
        Ok(state.contracts.iter().find(|c| c.id == contract_id).cloned())
    }

    async fn find_contract_by_pppoe(&self, pppoe: &str) -> Result<Option<Contract>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .contracts
            .iter()
            .find(|c| c.pppoe.as_deref() == Some(pppoe))
            .cloned())
    }

    async fn search_contracts(&self, term: &str, limit: i64) -> Result<Vec<ContractRef>, AppError> {
        let state = self.state.lock().await;
        let mut refs: Vec<ContractRef> = state
            .contracts
            .iter()
            .filter(|c| c.pppoe.is_some() && contains(c.pppoe.as_deref(), Some(term)))
            .map(|c| ContractRef { id: c.id, pppoe: c.pppoe.clone() })
            .collect();
        refs.sort_by(|a, b| a.pppoe.cmp(&b.pppoe));
        refs.truncate(limit as usize);
        Ok(refs)
    }

    async fn set_pendencia(&self, contract_id: i64, pendencia: bool) -> Result<Option<Contract>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.contracts.iter_mut().find(|c| c.id == contract_id).map(|c| {
            c.pendencia = pendencia;
            c.clone()
        }))
    }

    async fn set_status(
        &self,
        contract_id: i64,
        status: ContractStatus,
    ) -> Result<Option<Contract>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.contracts.iter_mut().find(|c| c.id == contract_id).map(|c| {
            c.status = Some(status);
            c.clone()
        }))
    }

    async fn find_client(&self, client_id: i64) -> Result<Option<Client>, AppError> {
        let state = self.state.lock().await;
        Ok(state.clients.iter().find(|c| c.id == client_id).cloned())
    }

    async fn document_data(&self, contract_id: i64) -> Result<Option<ContractDocumentData>, AppError> {
        let state = self.state.lock().await;
        let Some(contract) = state.contracts.iter().find(|c| c.id == contract_id) else {
            return Ok(None);
        };
        let client = state.clients.iter().find(|cl| Some(cl.id) == contract.id_cliente);
        let plan = state.plans.iter().find(|p| Some(p.id) == contract.id_plano);
        let bairro = state.neighbourhoods.iter().find(|b| Some(b.id) == contract.id_bairro);

        Ok(Some(ContractDocumentData {
            contract_id: contract.id,
            pppoe: contract.pppoe.clone(),
            endereco: contract.endereco.clone(),
            complemento: contract.complemento.clone(),
            dia_vencimento: contract.dia_vencimento,
            data_instalacao: contract.data_instalacao,
            cliente_nome: client.map(|c| c.nome.clone()),
            cpf_cnpj: client.and_then(|c| c.cpf_cnpj.clone()),
            rg: client.and_then(|c| c.rg.clone()),
            email: client.and_then(|c| c.email.clone()),
            fonewhats: client.and_then(|c| c.fonewhats.clone()),
            cep: client.and_then(|c| c.cep.clone()),
            plano_nome: plan.map(|p| p.nome.clone()),
            plano_valor: plan.map(|p| p.valor),
            bairro_nome: bairro.map(|b| b.nome.clone()),
            cidade: bairro.map(|b| b.cidade.clone()),
        }))
    }
}

#[async_trait]
impl InventoryTable for MemoryBackend {
    async fn list_materials(
        &self,
        filter: &MaterialFilter,
        page: PageRequest,
    ) -> Result<Page<Material>, AppError> {
        let state = self.state.lock().await;
        let mut rows: Vec<Material> = state
            .materials
            .iter()
            .filter(|m| m.id_modelo == Some(filter.id_modelo))
            .filter(|m| contains(Some(&m.serialnb), filter.serial.as_deref()))
            .filter(|m| filter.tipo.map_or(true, |t| m.tipo == t))
            .filter(|m| contains(m.etiqueta.as_deref(), filter.etiqueta.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(Page::slice(rows, page))
    }

    async fn model_summary(&self) -> Result<Vec<ModelSummary>, AppError> {
        let state = self.state.lock().await;
        let mut summary: Vec<ModelSummary> = state
            .models
            .iter()
            .filter_map(|model| {
                let mut used: Vec<&Material> =
                    state.materials.iter().filter(|m| m.id_modelo == Some(model.id)).collect();
                used.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
                let first = used.first()?;
                Some(ModelSummary {
                    id: model.id,
                    nome: model.nome.clone(),
                    marca: model.marca.clone(),
                    quantidade: used.len() as i64,
                    tipo: first.tipo,
                })
            })
            .collect();
        summary.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(summary)
    }

    async fn find_material(&self, material_id: i64) -> Result<Option<Material>, AppError> {
        let state = self.state.lock().await;
        Ok(state.materials.iter().find(|m| m.id == material_id).cloned())
    }

    async fn search_materials(&self, serial: &str, limit: i64) -> Result<Vec<Material>, AppError> {
        let state = self.state.lock().await;
        let mut found: Vec<Material> = state
            .materials
            .iter()
            .filter(|m| contains(Some(&m.serialnb), Some(serial)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.serialnb.cmp(&b.serialnb));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn insert_material(&self, draft: &MaterialDraft) -> Result<Material, AppError> {
        let mut state = self.state.lock().await;
        let material = Material {
            id: state.next_id(),
            serialnb: draft.serialnb.trim().to_string(),
            tipo: draft.tipo,
            id_modelo: draft.id_modelo,
            etiqueta: draft.etiqueta.clone(),
            observacoes: draft.observacoes.clone(),
            created_at: Utc::now(),
        };
        state.materials.push(material.clone());
        Ok(material)
    }

    async fn update_material(
        &self,
        material_id: i64,
        draft: &MaterialDraft,
    ) -> Result<Option<Material>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.materials.iter_mut().find(|m| m.id == material_id).map(|m| {
            m.serialnb = draft.serialnb.trim().to_string();
            m.tipo = draft.tipo;
            m.id_modelo = draft.id_modelo;
            m.etiqueta = draft.etiqueta.clone();
            m.observacoes = draft.observacoes.clone();
            m.clone()
        }))
    }

    async fn delete_material(&self, material_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let before = state.materials.len();
        state.materials.retain(|m| m.id != material_id);
        // ON DELETE CASCADE
        state.locations.retain(|l| l.material_id != material_id);
        // ON DELETE SET NULL
        for contract in state.contracts.iter_mut().filter(|c| c.id_material == Some(material_id)) {
            contract.id_material = None;
        }
        Ok(state.materials.len() < before)
    }

    async fn list_models(
        &self,
        filter: &ModelFilter,
        page: PageRequest,
    ) -> Result<Page<MaterialModel>, AppError> {
        let state = self.state.lock().await;
        let mut rows: Vec<MaterialModel> = state
            .models
            .iter()
            .filter(|m| contains(Some(&m.nome), filter.nome.as_deref()))
            .filter(|m| contains(Some(&m.marca), filter.marca.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.nome.cmp(&b.nome).then_with(|| a.id.cmp(&b.id)));
        Ok(Page::slice(rows, page))
    }

    async fn all_models(&self) -> Result<Vec<MaterialModel>, AppError> {
        let state = self.state.lock().await;
        let mut models = state.models.clone();
        models.sort_by(|a, b| a.nome.cmp(&b.nome).then_with(|| a.id.cmp(&b.id)));
        Ok(models)
    }

    async fn find_models(&self, model_ids: &[i64]) -> Result<Vec<MaterialModel>, AppError> {
        let state = self.state.lock().await;
        let mut models: Vec<MaterialModel> =
            state.models.iter().filter(|m| model_ids.contains(&m.id)).cloned().collect();
        models.sort_by(|a, b| a.nome.cmp(&b.nome).then_with(|| a.id.cmp(&b.id)));
        Ok(models)
    }

    async fn models_used_by(&self, tipo: MaterialTipo) -> Result<Vec<MaterialModel>, AppError> {
        let used: Vec<i64> = {
            let state = self.state.lock().await;
            state
                .materials
                .iter()
                .filter(|m| m.tipo == tipo)
                .filter_map(|m| m.id_modelo)
                .collect()
        };
        self.find_models(&used).await
    }

    async fn insert_model(&self, draft: &ModelDraft) -> Result<MaterialModel, AppError> {
        let mut state = self.state.lock().await;
        let model = MaterialModel {
            id: state.next_id(),
            nome: draft.nome.trim().to_string(),
            marca: draft.marca.trim().to_string(),
            created_at: Utc::now(),
        };
        state.models.push(model.clone());
        Ok(model)
    }

    async fn update_model(&self, model_id: i64, draft: &ModelDraft) -> Result<Option<MaterialModel>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.models.iter_mut().find(|m| m.id == model_id).map(|m| {
            m.nome = draft.nome.trim().to_string();
            m.marca = draft.marca.trim().to_string();
            m.clone()
        }))
    }

    async fn delete_model(&self, model_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let before = state.models.len();
        state.models.retain(|m| m.id != model_id);
        // ON DELETE SET NULL
        for material in state.materials.iter_mut().filter(|m| m.id_modelo == Some(model_id)) {
            material.id_modelo = None;
        }
        Ok(state.models.len() < before)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let state = self.state.lock().await;
        let mut vehicles = state.vehicles.clone();
        vehicles.sort_by(|a, b| a.placa.cmp(&b.placa));
        Ok(vehicles)
    }
}

#[async_trait]
impl LocationTable for MemoryBackend {
    async fn latest_location(&self, material_id: i64) -> Result<Option<LocationDetail>, AppError> {
        self.location_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;
        Ok(state.history(material_id).into_iter().next())
    }

    async fn latest_locations(&self, material_ids: &[i64]) -> Result<Vec<LocationDetail>, AppError> {
        self.location_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;
        Ok(material_ids
            .iter()
            .filter_map(|id| state.history(*id).into_iter().next())
            .collect())
    }

    async fn location_history(&self, material_id: i64) -> Result<Vec<LocationDetail>, AppError> {
        let state = self.state.lock().await;
        Ok(state.history(material_id))
    }

    async fn insert_location(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<LocationRecord, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.push_location(material_id, target, Utc::now()))
    }

    async fn insert_location_if_absent(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<Option<LocationRecord>, AppError> {
        let mut state = self.state.lock().await;
        if state.locations.iter().any(|l| l.material_id == material_id) {
            return Ok(None);
        }
        Ok(Some(state.push_location(material_id, target, Utc::now())))
    }
}

#[async_trait]
impl AgendaTable for MemoryBackend {
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AgendaEvent>, AppError> {
        let state = self.state.lock().await;
        let mut events: Vec<AgendaEvent> = state
            .events
            .iter()
            .filter(|e| e.datainicio < end && (e.datafinal > start || e.datainicio >= start))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.datainicio.cmp(&b.datainicio).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<AgendaEvent>, AppError> {
        let state = self.state.lock().await;
        Ok(state.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn insert_event(&self, draft: &EventDraft) -> Result<AgendaEvent, AppError> {
        let (Some(start), Some(end)) = (draft.datainicio, draft.datafinal) else {
            return Err(AppError::InternalServerError(anyhow::anyhow!("evento sem datas")));
        };
        let mut state = self.state.lock().await;
        let event = AgendaEvent {
            id: state.next_id(),
            nome: draft.nome.trim().to_string(),
            descricao: draft.descricao.clone(),
            datainicio: start,
            datafinal: end,
            tipo_evento: draft.tipo_evento.clone(),
            responsaveis: draft.responsaveis.clone(),
            horamarcada: draft.horamarcada,
            prioritario: draft.prioritario,
            realizada: draft.realizada,
            parcial: draft.parcial,
            cancelado: draft.cancelado,
            pppoe: draft.pppoe.clone(),
            cor: draft.cor.clone(),
        };
        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, event_id: i64, draft: &EventDraft) -> Result<Option<AgendaEvent>, AppError> {
        let (Some(start), Some(end)) = (draft.datainicio, draft.datafinal) else {
            return Err(AppError::InternalServerError(anyhow::anyhow!("evento sem datas")));
        };
        let mut state = self.state.lock().await;
        Ok(state.events.iter_mut().find(|e| e.id == event_id).map(|e| {
            e.nome = draft.nome.trim().to_string();
            e.descricao = draft.descricao.clone();
            e.datainicio = start;
            e.datafinal = end;
            e.tipo_evento = draft.tipo_evento.clone();
            e.responsaveis = draft.responsaveis.clone();
            e.horamarcada = draft.horamarcada;
            e.prioritario = draft.prioritario;
            e.realizada = draft.realizada;
            e.parcial = draft.parcial;
            e.cancelado = draft.cancelado;
            e.pppoe = draft.pppoe.clone();
            e.cor = draft.cor.clone();
            e.clone()
        }))
    }

    async fn update_event_dates(
        &self,
        event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<AgendaEvent>, AppError> {
        let mut state = self.state.lock().await;
        Ok(state.events.iter_mut().find(|e| e.id == event_id).map(|e| {
            e.datainicio = start;
            e.datafinal = end;
            e.clone()
        }))
    }

    async fn list_team(&self) -> Result<Vec<TeamMember>, AppError> {
        let state = self.state.lock().await;
        let mut team = state.team.clone();
        team.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(team)
    }
}

#[async_trait]
impl InstallationTable for MemoryBackend {
    async fn find_installation(&self, event_id: i64) -> Result<Option<Installation>, AppError> {
        let state = self.state.lock().await;
        Ok(state.installations.iter().find(|i| i.id_agenda == event_id).cloned())
    }

    async fn complete_installation(&self, plan: &InstallationPlan) -> Result<Installation, AppError> {
        let mut state = self.state.lock().await;

        if !state.events.iter().any(|e| e.id == plan.event_id) {
            return Err(AppError::EventNotFound(plan.event_id));
        }
        if let Some(existing) = state.installations.iter().find(|i| i.id_agenda == plan.event_id) {
            return Ok(existing.clone());
        }

        // Escreve numa cópia e só troca o estado no "commit".
        let mut tx = state.clone();

        if let Some(client_id) = plan.client_id {
            if let Some(client) = tx.clients.iter_mut().find(|c| c.id == client_id) {
                client.status = Some("Ativo".to_string());
            }
        }

        if let Some(contract_id) = plan.contract_id {
            if let Some(contract) = tx.contracts.iter_mut().find(|c| c.id == contract_id) {
                contract.status = Some(ContractStatus::Ativo);
                contract.data_instalacao = Some(plan.installed_at);
                if plan.material_id.is_some() {
                    contract.id_material = plan.material_id;
                }
            }
        }

        if self.fail_installation_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(
                "falha simulada no INSERT de instalacao".into(),
            )));
        }

        let installation = Installation {
            id: tx.next_id(),
            id_agenda: plan.event_id,
            id_contrato: plan.contract_id,
            id_user: plan.user_id,
            acompanhante: plan.acompanhante.clone(),
            relato: plan.relato.clone(),
            cto: plan.cto.clone(),
            porta: plan.porta.clone(),
            data_instalacao: plan.installed_at,
        };
        tx.installations.push(installation.clone());

        if let Some(event) = tx.events.iter_mut().find(|e| e.id == plan.event_id) {
            event.realizada = true;
            event.parcial = false;
        }

        if let (Some(material_id), Some(contract_id)) = (plan.material_id, plan.contract_id) {
            tx.push_location(material_id, LocationTarget::Contrato(contract_id), Utc::now());
        }

        *state = tx;
        Ok(installation)
    }
}
