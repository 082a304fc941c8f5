// src/services/installation_service.rs

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::tables::{AgendaTable, ContractTable, InstallationTable, InventoryTable},
    models::{
        agenda::{Installation, InstallationForm, InstallationPlan},
        auth::SessionContext,
        contract::ContractStatus,
    },
};

/// Conclusão de instalações agendadas.
#[derive(Clone)]
pub struct InstallationService {
    events: Arc<dyn AgendaTable>,
    installations: Arc<dyn InstallationTable>,
    contracts: Arc<dyn ContractTable>,
    materials: Arc<dyn InventoryTable>,
}

impl InstallationService {
    pub fn new(
        events: Arc<dyn AgendaTable>,
        installations: Arc<dyn InstallationTable>,
        contracts: Arc<dyn ContractTable>,
        materials: Arc<dyn InventoryTable>,
    ) -> Self {
        Self { events, installations, contracts, materials }
    }

    pub async fn find_installation(&self, event_id: i64) -> Result<Option<Installation>, AppError> {
        self.installations.find_installation(event_id).await
    }

    /// Registra a instalação do evento.
    ///
    /// As pré-condições são checadas antes de qualquer escrita; as escritas vão
    /// todas numa transação só. Reenviar um evento já instalado devolve o registro
    /// existente.
    pub async fn submit(
        &self,
        event_id: i64,
        form: InstallationForm,
        session: Option<&SessionContext>,
    ) -> Result<Installation, AppError> {
        let session = session.ok_or(AppError::Unauthorized)?;
        form.validate()?;

        let event = self
            .events
            .find_event(event_id)
            .await?
            .ok_or(AppError::EventNotFound(event_id))?;

        if let Some(existing) = self.installations.find_installation(event_id).await? {
            tracing::info!("Evento {} já tem instalação {}; nada a fazer", event_id, existing.id);
            return Ok(existing);
        }

        let pppoe = event.pppoe.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let contract = match pppoe {
            Some(pppoe) => Some(
                self.contracts
                    .find_contract_by_pppoe(pppoe)
                    .await?
                    .ok_or_else(|| AppError::ContractNotFound(pppoe.to_string()))?,
            ),
            None => None,
        };

        if let Some(contract) = &contract {
            if !ContractStatus::can_activate(contract.status) {
                return Err(AppError::InvalidContractTransition(format!(
                    "O contrato {} está cancelado e não pode ser ativado.",
                    contract.pppoe.as_deref().unwrap_or("-")
                )));
            }
        }

        if let Some(material_id) = form.material_id {
            if self.materials.find_material(material_id).await?.is_none() {
                return Err(AppError::MaterialNotFound(material_id));
            }
        }

        let plan = InstallationPlan {
            event_id,
            contract_id: contract.as_ref().map(|c| c.id),
            client_id: contract.as_ref().and_then(|c| c.id_cliente),
            material_id: form.material_id,
            user_id: session.user_id,
            acompanhante: form.acompanhante,
            relato: form.relato,
            cto: form.cto,
            porta: form.porta,
            installed_at: form.data_instalacao.unwrap_or_else(Utc::now),
        };

        self.installations.complete_installation(&plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryBackend;
    use crate::models::{
        agenda::INSTALLATION_EVENT_TYPE,
        inventory::{LocationTarget, MaterialTipo},
    };
    use uuid::Uuid;

    struct Fixture {
        backend: Arc<MemoryBackend>,
        service: InstallationService,
        session: SessionContext,
        event_id: i64,
        contract_id: i64,
        client_id: i64,
        material_id: i64,
    }

    async fn fixture() -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let client = backend.add_client("Paulo Reis", Some("987.654.321-00"), None).await;
        let contract = backend
            .add_contract(Some(client.id), Some("paulo01"), Some(ContractStatus::Agendado), false)
            .await;
        let material = backend.add_material("ZTEG00001", MaterialTipo::Onu, None).await;
        let event = backend
            .add_event("Instalação Paulo", Some(INSTALLATION_EVENT_TYPE), Some("paulo01"))
            .await;

        let service = InstallationService::new(backend.clone(), backend.clone(), backend.clone(), backend.clone());
        Fixture {
            backend,
            service,
            session: SessionContext { user_id: Uuid::new_v4(), email: Some("tecnico@nostranet.com.br".into()) },
            event_id: event.id,
            contract_id: contract.id,
            client_id: client.id,
            material_id: material.id,
        }
    }

    fn form(material_id: Option<i64>) -> InstallationForm {
        InstallationForm {
            material_id,
            acompanhante: Some("Rita".into()),
            relato: Some("Instalado sem intercorrências".into()),
            cto: Some("CTO-12".into()),
            porta: Some("4".into()),
            data_instalacao: None,
        }
    }

    #[tokio::test]
    async fn submission_applies_every_effect() {
        let f = fixture().await;

        let installation = f
            .service
            .submit(f.event_id, form(Some(f.material_id)), Some(&f.session))
            .await
            .unwrap();
        assert_eq!(installation.id_user, f.session.user_id);
        assert_eq!(installation.id_contrato, Some(f.contract_id));

        let state = f.backend.snapshot().await;
        let client = state.clients.iter().find(|c| c.id == f.client_id).unwrap();
        assert_eq!(client.status.as_deref(), Some("Ativo"));

        let contract = state.contracts.iter().find(|c| c.id == f.contract_id).unwrap();
        assert_eq!(contract.status, Some(ContractStatus::Ativo));
        assert_eq!(contract.data_instalacao, Some(installation.data_instalacao));
        assert_eq!(contract.id_material, Some(f.material_id));

        let event = state.events.iter().find(|e| e.id == f.event_id).unwrap();
        assert!(event.realizada);
        assert!(!event.parcial);

        assert_eq!(state.installations.len(), 1);

        let moves: Vec<_> = state.locations.iter().filter(|l| l.material_id == f.material_id).collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].target().unwrap(), LocationTarget::Contrato(f.contract_id));
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_all_writes() {
        let f = fixture().await;
        f.backend.fail_installation_insert();

        let err = f
            .service
            .submit(f.event_id, form(Some(f.material_id)), Some(&f.session))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));

        let state = f.backend.snapshot().await;
        assert!(state.installations.is_empty());
        assert!(state.locations.is_empty());
        assert_eq!(state.clients.iter().find(|c| c.id == f.client_id).unwrap().status, None);
        let contract = state.contracts.iter().find(|c| c.id == f.contract_id).unwrap();
        assert_eq!(contract.status, Some(ContractStatus::Agendado));
        assert_eq!(contract.data_instalacao, None);
        let event = state.events.iter().find(|e| e.id == f.event_id).unwrap();
        assert!(!event.realizada);
        assert!(event.parcial);
    }

    #[tokio::test]
    async fn resubmission_returns_existing_record() {
        let f = fixture().await;

        let first = f.service.submit(f.event_id, form(None), Some(&f.session)).await.unwrap();
        let second = f.service.submit(f.event_id, form(Some(f.material_id)), Some(&f.session)).await.unwrap();
        assert_eq!(first, second);

        let state = f.backend.snapshot().await;
        assert_eq!(state.installations.len(), 1);
        assert!(state.locations.is_empty());
        assert_eq!(state.contracts.iter().find(|c| c.id == f.contract_id).unwrap().id_material, None);
    }

    #[tokio::test]
    async fn preconditions_are_checked_before_writing() {
        let f = fixture().await;

        assert!(matches!(
            f.service.submit(f.event_id, form(None), None).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            f.service.submit(404, form(None), Some(&f.session)).await,
            Err(AppError::EventNotFound(404))
        ));
        assert!(matches!(
            f.service.submit(f.event_id, form(Some(777)), Some(&f.session)).await,
            Err(AppError::MaterialNotFound(777))
        ));

        let orphan = f
            .backend
            .add_event("Instalação", Some(INSTALLATION_EVENT_TYPE), Some("inexistente"))
            .await;
        assert!(matches!(
            f.service.submit(orphan.id, form(None), Some(&f.session)).await,
            Err(AppError::ContractNotFound(_))
        ));

        f.backend
            .update_contract(f.contract_id, |c| c.status = Some(ContractStatus::Cancelado))
            .await;
        assert!(matches!(
            f.service.submit(f.event_id, form(None), Some(&f.session)).await,
            Err(AppError::InvalidContractTransition(_))
        ));

        assert!(f.backend.snapshot().await.installations.is_empty());
    }
}
