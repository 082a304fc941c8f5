// src/services/agenda_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::tables::AgendaTable,
    models::{
        agenda::{AgendaEvent, CalendarEvent, EventClient, EventDates, EventDraft},
        auth::TeamMember,
    },
    services::contract_service::ContractService,
};

#[derive(Clone)]
pub struct AgendaService {
    events: Arc<dyn AgendaTable>,
    contracts: ContractService,
}

impl AgendaService {
    pub fn new(events: Arc<dyn AgendaTable>, contracts: ContractService) -> Self {
        Self { events, contracts }
    }

    /// Eventos que tocam o intervalo visível do calendário.
    pub async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let events = self.events.events_between(start, end).await?;
        Ok(events.iter().map(CalendarEvent::from).collect())
    }

    pub async fn find_event(&self, event_id: i64) -> Result<AgendaEvent, AppError> {
        self.events
            .find_event(event_id)
            .await?
            .ok_or(AppError::EventNotFound(event_id))
    }

    /// Cria (`event_id` vazio) ou atualiza o evento. Instalação com PPPoE agenda o contrato.
    pub async fn save_event(&self, event_id: Option<i64>, mut draft: EventDraft) -> Result<AgendaEvent, AppError> {
        draft.validate()?;
        draft.horamarcada = true;

        let event = match event_id {
            Some(id) => self
                .events
                .update_event(id, &draft)
                .await?
                .ok_or(AppError::EventNotFound(id))?,
            None => self.events.insert_event(&draft).await?,
        };
        tracing::info!("Evento {} salvo ({:?})", event.id, event.tipo_evento);

        if let Some(pppoe) = draft.schedules_contract() {
            self.contracts.schedule_by_pppoe(pppoe).await?;
        }

        Ok(event)
    }

    /// Arrastar e soltar no calendário. Sem fim, o evento termina onde começa.
    pub async fn update_dates(&self, event_id: i64, dates: EventDates) -> Result<AgendaEvent, AppError> {
        let end = dates.end.unwrap_or(dates.start);
        self.events
            .update_event_dates(event_id, dates.start, end)
            .await?
            .ok_or(AppError::EventNotFound(event_id))
    }

    pub async fn list_team(&self) -> Result<Vec<TeamMember>, AppError> {
        self.events.list_team().await
    }

    /// Contrato e cliente vinculados ao PPPoE do evento.
    pub async fn event_client(&self, event_id: i64) -> Result<EventClient, AppError> {
        let event = self.find_event(event_id).await?;
        let pppoe = event
            .pppoe
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::ContractNotFound(format!("evento {}", event_id)))?;

        let contract = self.contracts.find_by_pppoe(pppoe).await?;
        let client = match contract.id_cliente {
            Some(client_id) => self.contracts.find_client(client_id).await?,
            None => None,
        };

        Ok(EventClient {
            contrato_id: contract.id,
            pppoe: contract.pppoe,
            cliente_id: client.as_ref().map(|c| c.id),
            cliente_nome: client.map(|c| c.nome),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryBackend;
    use crate::models::{agenda::INSTALLATION_EVENT_TYPE, contract::ContractStatus};
    use chrono::{Duration, TimeZone};

    fn setup() -> (Arc<MemoryBackend>, AgendaService) {
        let backend = Arc::new(MemoryBackend::new());
        let contracts = ContractService::new(backend.clone());
        (backend.clone(), AgendaService::new(backend, contracts))
    }

    fn draft(nome: &str, tipo: Option<&str>, pppoe: Option<&str>) -> EventDraft {
        let start = Utc::now();
        EventDraft {
            nome: nome.into(),
            descricao: None,
            datainicio: Some(start),
            datafinal: Some(start + Duration::hours(2)),
            tipo_evento: tipo.map(str::to_string),
            responsaveis: vec!["Ana".into()],
            horamarcada: false,
            prioritario: false,
            realizada: false,
            parcial: false,
            cancelado: false,
            pppoe: pppoe.map(str::to_string),
            cor: None,
        }
    }

    #[tokio::test]
    async fn saving_installation_event_schedules_contract() {
        let (backend, service) = setup();
        let client = backend.add_client("Carla Dias", None, None).await;
        let contract = backend.add_contract(Some(client.id), Some("carla01"), None, false).await;

        let event = service
            .save_event(None, draft("Instalação Carla", Some(INSTALLATION_EVENT_TYPE), Some("carla01")))
            .await
            .unwrap();
        assert!(event.horamarcada);

        let state = backend.snapshot().await;
        let saved = state.contracts.iter().find(|c| c.id == contract.id).unwrap();
        assert_eq!(saved.status, Some(ContractStatus::Agendado));
    }

    #[tokio::test]
    async fn other_event_types_leave_contract_alone() {
        let (backend, service) = setup();
        let contract = backend.add_contract(None, Some("carla01"), None, false).await;

        service
            .save_event(None, draft("Manutenção", Some("Manutenção"), Some("carla01")))
            .await
            .unwrap();

        let state = backend.snapshot().await;
        assert_eq!(state.contracts.iter().find(|c| c.id == contract.id).unwrap().status, None);
    }

    #[tokio::test]
    async fn invalid_draft_and_unknown_pppoe_are_rejected() {
        let (_, service) = setup();

        let mut blank = draft("  ", None, None);
        blank.datafinal = None;
        assert!(matches!(service.save_event(None, blank).await, Err(AppError::ValidationError(_))));

        let unknown = draft("Instalação", Some(INSTALLATION_EVENT_TYPE), Some("ninguem"));
        assert!(matches!(service.save_event(None, unknown).await, Err(AppError::ContractNotFound(_))));

        assert!(matches!(
            service.save_event(Some(999), draft("Visita", None, None)).await,
            Err(AppError::EventNotFound(999))
        ));
    }

    #[tokio::test]
    async fn dragging_without_end_collapses_to_start() {
        let (backend, service) = setup();
        let event = backend.add_event("Visita", None, None).await;
        let start = event.datainicio + Duration::days(1);

        let moved = service.update_dates(event.id, EventDates { start, end: None }).await.unwrap();
        assert_eq!(moved.datainicio, start);
        assert_eq!(moved.datafinal, start);
    }

    #[tokio::test]
    async fn all_day_drop_on_first_visible_day_stays_visible() {
        let (backend, service) = setup();
        let event = backend.add_event("Visita", None, None).await;
        let week_start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();

        service.update_dates(event.id, EventDates { start: week_start, end: None }).await.unwrap();

        let week = service.events_between(week_start, week_start + Duration::days(7)).await.unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].id, event.id);

        // Semana anterior termina exatamente onde o evento começa.
        let before = service.events_between(week_start - Duration::days(7), week_start).await.unwrap();
        assert!(before.is_empty());
    }

    #[tokio::test]
    async fn event_ending_at_range_start_is_left_out() {
        let (backend, service) = setup();
        let event = backend.add_event("Visita", None, None).await;
        let start = Utc.with_ymd_and_hms(2024, 3, 3, 22, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        service.update_dates(event.id, EventDates { start, end: Some(end) }).await.unwrap();

        let week = service.events_between(end, end + Duration::days(7)).await.unwrap();
        assert!(week.is_empty());
    }

    #[tokio::test]
    async fn events_between_returns_calendar_shape() {
        let (backend, service) = setup();
        let event = backend.add_event("Instalação", Some(INSTALLATION_EVENT_TYPE), Some("x")).await;

        let window = service
            .events_between(event.datainicio - Duration::hours(1), event.datainicio + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].title, "Instalação");

        let empty = service
            .events_between(event.datafinal + Duration::days(1), event.datafinal + Duration::days(2))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn event_client_resolves_contract_and_client() {
        let (backend, service) = setup();
        let client = backend.add_client("Carla Dias", None, None).await;
        let contract = backend.add_contract(Some(client.id), Some("carla01"), None, false).await;
        let event = backend.add_event("Instalação", Some(INSTALLATION_EVENT_TYPE), Some("carla01")).await;
        let orphan = backend.add_event("Visita", None, None).await;

        let found = service.event_client(event.id).await.unwrap();
        assert_eq!(found.contrato_id, contract.id);
        assert_eq!(found.cliente_nome.as_deref(), Some("Carla Dias"));

        assert!(matches!(service.event_client(orphan.id).await, Err(AppError::ContractNotFound(_))));
    }
}
