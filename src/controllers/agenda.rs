// src/controllers/agenda.rs

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::{
    common::{
        error::AppError,
        search::{LiveSearch, SearchOutcome},
    },
    config::AppState,
    controllers::Notification,
    middleware::i18n::Locale,
    models::{
        agenda::{AgendaEvent, CalendarEvent, EventClient, EventDates, EventDraft, InstallationForm},
        auth::{SessionContext, TeamMember},
        contract::ContractRef,
        inventory::Material,
    },
    services::{
        agenda_service::AgendaService, contract_service::ContractService,
        installation_service::InstallationService, inventory_service::InventoryService,
    },
};

/// Modal de conclusão da instalação aberto a partir de um evento.
pub struct InstallationModal {
    pub event_id: i64,
    pub client: Option<EventClient>,
    serial_search: LiveSearch<Material>,
}

impl InstallationModal {
    pub fn serial_results(&self) -> watch::Receiver<SearchOutcome<Material>> {
        self.serial_search.subscribe()
    }
}

pub struct AgendaController {
    agenda: AgendaService,
    installations: InstallationService,
    contracts: ContractService,
    inventory: InventoryService,
    locale: Locale,
    debounce: std::time::Duration,

    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub events: Vec<CalendarEvent>,
    pub team: Vec<TeamMember>,

    pub modal_open: bool,
    pub selected_event: Option<AgendaEvent>,
    pub draft: EventDraft,
    contract_search: LiveSearch<ContractRef>,

    pub installation: Option<InstallationModal>,
    pub notification: Option<Notification>,
}

impl AgendaController {
    pub fn new(app_state: &AppState, locale: Locale) -> Self {
        let debounce = app_state.config.search_debounce;
        let contract_search = LiveSearch::new(debounce, locale.clone());
        Self {
            agenda: app_state.agenda_service.clone(),
            installations: app_state.installation_service.clone(),
            contracts: app_state.contract_service.clone(),
            inventory: app_state.inventory_service.clone(),
            locale,
            debounce,
            range: None,
            events: Vec::new(),
            team: Vec::new(),
            modal_open: false,
            selected_event: None,
            draft: EventDraft::blank(),
            contract_search,
            installation: None,
            notification: None,
        }
    }

    fn fail(&mut self, context: &str, err: &AppError) {
        self.notification = Some(Notification::failure(context, err, &self.locale));
    }

    /// Intervalo visível do calendário mudou.
    pub async fn load_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.range = Some((start, end));
        self.reload().await;
    }

    async fn reload(&mut self) {
        let Some((start, end)) = self.range else {
            return;
        };
        match self.agenda.events_between(start, end).await {
            Ok(events) => self.events = events,
            Err(e) => self.fail("Erro ao carregar eventos", &e),
        }
    }

    pub async fn load_team(&mut self) {
        match self.agenda.list_team().await {
            Ok(team) => self.team = team,
            Err(e) => self.fail("Erro ao carregar usuários", &e),
        }
    }

    /// Clique num dia vazio: novo evento começando ali.
    pub fn open_new(&mut self, start: Option<DateTime<Utc>>) {
        self.selected_event = None;
        self.draft = EventDraft::blank();
        self.draft.datainicio = start;
        self.draft.datafinal = start;
        self.modal_open = true;
    }

    pub async fn open_event(&mut self, event_id: i64) {
        match self.agenda.find_event(event_id).await {
            Ok(event) => {
                self.draft = EventDraft::from(&event);
                self.selected_event = Some(event);
                self.modal_open = true;
            }
            Err(e) => self.fail("Erro ao carregar evento", &e),
        }
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
        self.selected_event = None;
        self.draft = EventDraft::blank();
        self.contract_search.clear();
    }

    /// Salva o formulário aberto. Nome e datas são conferidos antes de ir ao banco.
    pub async fn save_event(&mut self) {
        if self.draft.nome.trim().is_empty() {
            self.notification = Some(Notification::Error("O nome do evento é obrigatório".into()));
            return;
        }
        if self.draft.datainicio.is_none() || self.draft.datafinal.is_none() {
            self.notification = Some(Notification::Error("Data inicial e final são obrigatórias".into()));
            return;
        }

        let editing = self.selected_event.as_ref().map(|e| e.id);
        match self.agenda.save_event(editing, self.draft.clone()).await {
            Ok(_) => {
                self.notification = Some(Notification::success(if editing.is_some() {
                    "Evento atualizado!"
                } else {
                    "Evento criado!"
                }));
                self.close_modal();
                self.reload().await;
            }
            Err(e) => self.fail("Erro ao salvar evento", &e),
        }
    }

    /// Arrastar ou redimensionar no calendário.
    pub async fn move_event(&mut self, event_id: i64, start: DateTime<Utc>, end: Option<DateTime<Utc>>) {
        match self.agenda.update_dates(event_id, EventDates { start, end }).await {
            Ok(_) => {
                self.notification = Some(Notification::success("Evento atualizado com sucesso!"));
                self.reload().await;
            }
            Err(e) => {
                self.fail("Erro ao atualizar evento", &e);
                // Desfaz o arraste na tela.
                self.reload().await;
            }
        }
    }

    /// Tecla no campo de PPPoE do formulário.
    pub fn search_contracts(&mut self, term: &str) {
        let contracts = self.contracts.clone();
        self.contract_search
            .input(term, move |term| async move { contracts.search_by_pppoe(&term).await });
    }

    pub fn contract_results(&self) -> watch::Receiver<SearchOutcome<ContractRef>> {
        self.contract_search.subscribe()
    }

    pub fn pick_contract(&mut self, contract: &ContractRef) {
        self.draft.pppoe = contract.pppoe.clone();
        self.contract_search.clear();
    }

    // ---
    // Instalação
    // ---

    pub async fn open_installation(&mut self, event_id: i64) {
        let client = match self.agenda.event_client(event_id).await {
            Ok(client) => Some(client),
            Err(e) => {
                self.fail("Erro ao buscar dados do cliente", &e);
                None
            }
        };
        self.installation = Some(InstallationModal {
            event_id,
            client,
            serial_search: LiveSearch::new(self.debounce, self.locale.clone()),
        });
    }

    /// Tecla no seletor de ONU do modal.
    pub fn search_serial(&mut self, term: &str) {
        let Some(modal) = self.installation.as_mut() else {
            return;
        };
        let inventory = self.inventory.clone();
        modal
            .serial_search
            .input(term, move |term| async move { inventory.search_by_serial(&term).await });
    }

    pub async fn submit_installation(&mut self, form: InstallationForm, session: Option<&SessionContext>) {
        let Some(event_id) = self.installation.as_ref().map(|m| m.event_id) else {
            return;
        };

        match self.installations.submit(event_id, form, session).await {
            Ok(_) => {
                self.notification = Some(Notification::success("Instalação salva com sucesso!"));
                self.installation = None;
                self.reload().await;
            }
            Err(e) => self.fail("Erro ao salvar instalação", &e),
        }
    }

    pub fn close_installation(&mut self) {
        self.installation = None;
    }
}
