// src/controllers/financeiro.rs

use crate::{
    common::error::AppError,
    config::AppState,
    controllers::{Notification, PageCursor},
    middleware::i18n::Locale,
    models::contract::{ContractFilter, ContractListing, ContractStatusFilter},
    services::contract_service::ContractService,
};

/// Tela do financeiro: lista de contratos com filtros e a marcação de pendência.
pub struct FinanceiroController {
    contracts: ContractService,
    locale: Locale,
    pub filter: ContractFilter,
    pub cursor: PageCursor,
    pub rows: Vec<ContractListing>,
    pub total: i64,
    pub selected: Option<ContractListing>,
    pub notification: Option<Notification>,
}

impl FinanceiroController {
    pub fn new(app_state: &AppState, locale: Locale) -> Self {
        Self {
            contracts: app_state.contract_service.clone(),
            locale,
            filter: ContractFilter::default(),
            cursor: PageCursor::default(),
            rows: Vec::new(),
            total: 0,
            selected: None,
            notification: None,
        }
    }

    pub async fn refresh(&mut self) {
        match self.contracts.list_contracts(&self.filter, self.cursor.request()).await {
            Ok(page) => {
                self.cursor.absorb(&page);
                self.total = page.total;
                self.rows = page.items;
            }
            Err(e) => {
                self.rows.clear();
                self.notification = Some(Notification::failure("Erro ao carregar contratos", &e, &self.locale));
            }
        }
    }

    async fn refetch_from_first_page(&mut self) {
        self.cursor.reset();
        self.refresh().await;
    }

    pub async fn set_search(&mut self, term: &str) {
        let term = term.trim();
        self.filter.search = (!term.is_empty()).then(|| term.to_string());
        self.refetch_from_first_page().await;
    }

    /// Valor do seletor de status; um valor desconhecido não altera o filtro.
    pub async fn set_status(&mut self, value: &str) {
        match ContractStatusFilter::parse(value) {
            Some(status) => {
                self.filter.status = status;
                self.refetch_from_first_page().await;
            }
            None => {
                let err = AppError::NotFound(format!("status {}", value));
                self.notification = Some(Notification::failure("Filtro de status inválido", &err, &self.locale));
            }
        }
    }

    pub async fn set_asaas_only(&mut self, asaas_only: bool) {
        self.filter.asaas_only = asaas_only;
        self.refetch_from_first_page().await;
    }

    pub async fn go_to_page(&mut self, page: i64) {
        if self.cursor.go_to(page) {
            self.refresh().await;
        }
    }

    pub fn open_contract(&mut self, contract_id: i64) {
        self.selected = self.rows.iter().find(|r| r.id == contract_id).cloned();
    }

    pub fn close_contract(&mut self) {
        self.selected = None;
    }

    pub async fn toggle_pendencia(&mut self, contract_id: i64) {
        let Some(current) = self.rows.iter().find(|r| r.id == contract_id).map(|r| r.pendencia) else {
            return;
        };

        match self.contracts.set_pendencia(contract_id, !current).await {
            Ok(_) => {
                self.notification = Some(Notification::success(if current {
                    "Pendência removida!"
                } else {
                    "Contrato marcado com pendência!"
                }));
                self.refresh().await;
            }
            Err(e) => {
                self.notification = Some(Notification::failure("Erro ao atualizar pendência", &e, &self.locale));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        config::{Backend, Config},
        db::memory::MemoryBackend,
        models::contract::ContractStatus,
    };

    async fn controller_with(contracts: usize) -> (FinanceiroController, Arc<MemoryBackend>) {
        let store = Arc::new(MemoryBackend::new());
        let client = store.add_client("Ana Lima", None, None).await;
        for i in 0..contracts {
            let pendencia = i % 5 == 0;
            store
                .add_contract(Some(client.id), Some(&format!("ana{:02}", i)), Some(ContractStatus::Ativo), pendencia)
                .await;
        }
        let state = AppState::from_backend(Config::for_tests(), Backend::memory(store.clone()));
        (FinanceiroController::new(&state, Locale::default()), store)
    }

    #[tokio::test]
    async fn filter_change_goes_back_to_first_page() {
        let (mut ctrl, _) = controller_with(25).await;
        ctrl.refresh().await;
        assert_eq!(ctrl.cursor.total_pages, 3);

        ctrl.go_to_page(3).await;
        assert_eq!(ctrl.cursor.page, 3);
        assert_eq!(ctrl.rows.len(), 5);

        ctrl.set_status("pendencia").await;
        assert_eq!(ctrl.cursor.page, 1);
        assert_eq!(ctrl.total, 5);
        assert!(ctrl.rows.iter().all(|r| r.pendencia));
    }

    #[tokio::test]
    async fn unknown_status_keeps_filter_and_notifies() {
        let (mut ctrl, _) = controller_with(3).await;
        ctrl.refresh().await;

        ctrl.set_status("Suspenso").await;
        assert_eq!(ctrl.filter.status, ContractStatusFilter::All);
        assert!(ctrl.notification.as_ref().is_some_and(Notification::is_error));
    }

    #[tokio::test]
    async fn toggling_pendencia_refreshes_rows() {
        let (mut ctrl, _) = controller_with(2).await;
        ctrl.refresh().await;
        let target = ctrl.rows.iter().find(|r| !r.pendencia).map(|r| r.id).unwrap();

        ctrl.toggle_pendencia(target).await;
        assert_eq!(
            ctrl.notification,
            Some(Notification::success("Contrato marcado com pendência!"))
        );
        assert!(ctrl.rows.iter().find(|r| r.id == target).unwrap().pendencia);
    }
}
