// src/services/contract_service.rs

use std::sync::Arc;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
        search::SEARCH_RESULT_LIMIT,
    },
    db::tables::ContractTable,
    models::contract::{Client, Contract, ContractDocumentData, ContractFilter, ContractListing, ContractRef, ContractStatus},
};

#[derive(Clone)]
pub struct ContractService {
    contracts: Arc<dyn ContractTable>,
}

impl ContractService {
    pub fn new(contracts: Arc<dyn ContractTable>) -> Self {
        Self { contracts }
    }

    /// Listagem do financeiro, mais recentes primeiro.
    pub async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, AppError> {
        self.contracts.list_contracts(filter, page.normalized()).await
    }

    pub async fn set_pendencia(&self, contract_id: i64, pendencia: bool) -> Result<Contract, AppError> {
        let contract = self
            .contracts
            .set_pendencia(contract_id, pendencia)
            .await?
            .ok_or_else(|| AppError::ContractNotFound(contract_id.to_string()))?;
        tracing::info!("Pendência do contrato {} = {}", contract_id, pendencia);
        Ok(contract)
    }

    pub async fn search_by_pppoe(&self, term: &str) -> Result<Vec<ContractRef>, AppError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.contracts.search_contracts(term, SEARCH_RESULT_LIMIT).await
    }

    pub async fn find_by_pppoe(&self, pppoe: &str) -> Result<Contract, AppError> {
        self.contracts
            .find_contract_by_pppoe(pppoe)
            .await?
            .ok_or_else(|| AppError::ContractNotFound(pppoe.to_string()))
    }

    /// Marca o contrato como Agendado. Contratos fora de {sem status, Agendado}
    /// ficam como estão.
    pub async fn schedule_by_pppoe(&self, pppoe: &str) -> Result<Contract, AppError> {
        let contract = self.find_by_pppoe(pppoe).await?;

        if !ContractStatus::can_schedule(contract.status) {
            tracing::warn!(
                "Contrato {} ({}) está {:?}; status mantido ao agendar instalação",
                contract.id,
                pppoe,
                contract.status
            );
            return Ok(contract);
        }

        self.contracts
            .set_status(contract.id, ContractStatus::Agendado)
            .await?
            .ok_or_else(|| AppError::ContractNotFound(pppoe.to_string()))
    }

    pub async fn find_client(&self, client_id: i64) -> Result<Option<Client>, AppError> {
        self.contracts.find_client(client_id).await
    }

    pub async fn document_data(&self, contract_id: i64) -> Result<ContractDocumentData, AppError> {
        self.contracts
            .document_data(contract_id)
            .await?
            .ok_or_else(|| AppError::ContractNotFound(contract_id.to_string()))
    }
}
