// src/db/agenda_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::tables::{AgendaTable, InstallationTable},
    models::{
        agenda::{AgendaEvent, EventDraft, Installation, InstallationPlan},
        auth::TeamMember,
        contract::ContractStatus,
        inventory::LocationKind,
    },
};

const EVENT_COLUMNS: &str = "id, nome, descricao, datainicio, datafinal, tipo_evento, responsaveis, \
     horamarcada, prioritario, realizada, parcial, cancelado, pppoe, cor";

const INSTALLATION_COLUMNS: &str =
    "id, id_agenda, id_contrato, id_user, acompanhante, relato, cto, porta, data_instalacao";

#[derive(Clone)]
pub struct AgendaRepository {
    pool: PgPool,
}

impl AgendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaTable for AgendaRepository {
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AgendaEvent>, AppError> {
        // Evento sem duração que começa no início do intervalo também aparece.
        let sql = format!(
            "SELECT {} FROM agenda WHERE datainicio < $2 AND (datafinal > $1 OR datainicio >= $1) ORDER BY datainicio, id",
            EVENT_COLUMNS
        );
        let events = sqlx::query_as::<_, AgendaEvent>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<AgendaEvent>, AppError> {
        let sql = format!("SELECT {} FROM agenda WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, AgendaEvent>(&sql)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn insert_event(&self, draft: &EventDraft) -> Result<AgendaEvent, AppError> {
        let sql = format!(
            r#"
            INSERT INTO agenda (nome, descricao, datainicio, datafinal, tipo_evento, responsaveis,
                                horamarcada, prioritario, realizada, parcial, cancelado, pppoe, cor)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, AgendaEvent>(&sql)
            .bind(draft.nome.trim())
            .bind(draft.descricao.as_deref())
            .bind(draft.datainicio)
            .bind(draft.datafinal)
            .bind(draft.tipo_evento.as_deref())
            .bind(&draft.responsaveis)
            .bind(draft.horamarcada)
            .bind(draft.prioritario)
            .bind(draft.realizada)
            .bind(draft.parcial)
            .bind(draft.cancelado)
            .bind(draft.pppoe.as_deref())
            .bind(draft.cor.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    async fn update_event(&self, event_id: i64, draft: &EventDraft) -> Result<Option<AgendaEvent>, AppError> {
        let sql = format!(
            r#"
            UPDATE agenda
            SET nome = $2, descricao = $3, datainicio = $4, datafinal = $5, tipo_evento = $6,
                responsaveis = $7, horamarcada = $8, prioritario = $9, realizada = $10,
                parcial = $11, cancelado = $12, pppoe = $13, cor = $14
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, AgendaEvent>(&sql)
            .bind(event_id)
            .bind(draft.nome.trim())
            .bind(draft.descricao.as_deref())
            .bind(draft.datainicio)
            .bind(draft.datafinal)
            .bind(draft.tipo_evento.as_deref())
            .bind(&draft.responsaveis)
            .bind(draft.horamarcada)
            .bind(draft.prioritario)
            .bind(draft.realizada)
            .bind(draft.parcial)
            .bind(draft.cancelado)
            .bind(draft.pppoe.as_deref())
            .bind(draft.cor.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn update_event_dates(
        &self,
        event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<AgendaEvent>, AppError> {
        let sql = format!(
            "UPDATE agenda SET datainicio = $2, datafinal = $3 WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, AgendaEvent>(&sql)
            .bind(event_id)
            .bind(start)
            .bind(end)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list_team(&self) -> Result<Vec<TeamMember>, AppError> {
        let team = sqlx::query_as::<_, TeamMember>("SELECT id, nome FROM usuarios ORDER BY nome")
            .fetch_all(&self.pool)
            .await?;
        Ok(team)
    }
}

#[async_trait]
impl InstallationTable for AgendaRepository {
    async fn find_installation(&self, event_id: i64) -> Result<Option<Installation>, AppError> {
        let sql = format!("SELECT {} FROM instalacao WHERE id_agenda = $1", INSTALLATION_COLUMNS);
        let installation = sqlx::query_as::<_, Installation>(&sql)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(installation)
    }

    async fn complete_installation(&self, plan: &InstallationPlan) -> Result<Installation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava o evento: submissões simultâneas do mesmo evento viram uma só.
        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM agenda WHERE id = $1 FOR UPDATE")
            .bind(plan.event_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::EventNotFound(plan.event_id));
        }

        let select_existing = format!("SELECT {} FROM instalacao WHERE id_agenda = $1", INSTALLATION_COLUMNS);
        let existing = sqlx::query_as::<_, Installation>(&select_existing)
            .bind(plan.event_id)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some(existing) = existing {
            tx.rollback().await?;
            return Ok(existing);
        }

        if let Some(client_id) = plan.client_id {
            sqlx::query("UPDATE clientes SET status = 'Ativo' WHERE id = $1")
                .bind(client_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(contract_id) = plan.contract_id {
            sqlx::query(
                r#"
                UPDATE contratos
                SET status = $2, data_instalacao = $3, id_material = COALESCE($4, id_material)
                WHERE id = $1
                "#,
            )
            .bind(contract_id)
            .bind(ContractStatus::Ativo)
            .bind(plan.installed_at)
            .bind(plan.material_id)
            .execute(&mut *tx)
            .await?;
        }

        let insert = format!(
            r#"
            INSERT INTO instalacao (id_agenda, id_contrato, id_user, acompanhante, relato, cto, porta, data_instalacao)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            INSTALLATION_COLUMNS
        );
        let installation = sqlx::query_as::<_, Installation>(&insert)
            .bind(plan.event_id)
            .bind(plan.contract_id)
            .bind(plan.user_id)
            .bind(plan.acompanhante.as_deref())
            .bind(plan.relato.as_deref())
            .bind(plan.cto.as_deref())
            .bind(plan.porta.as_deref())
            .bind(plan.installed_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE agenda SET realizada = TRUE, parcial = FALSE WHERE id = $1")
            .bind(plan.event_id)
            .execute(&mut *tx)
            .await?;

        // O equipamento instalado passa a ficar no contrato.
        if let (Some(material_id), Some(contract_id)) = (plan.material_id, plan.contract_id) {
            sqlx::query(
                r#"
                INSERT INTO localizacao_materiais (material_id, localizacao_tipo, contrato_id, empresa)
                VALUES ($1, $2, $3, FALSE)
                "#,
            )
            .bind(material_id)
            .bind(LocationKind::Contrato)
            .bind(contract_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Instalação {} registrada para o evento {}",
            installation.id,
            installation.id_agenda
        );
        Ok(installation)
    }
}
