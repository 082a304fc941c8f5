// src/db/contract_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::{query::TableQuery, tables::ContractTable},
    models::contract::{
        Client, Contract, ContractDocumentData, ContractFilter, ContractListing, ContractRef,
        ContractStatus, ContractStatusFilter,
    },
};

const CONTRACT_COLUMNS: &str = "id, created_at, status, pendencia, endereco, complemento, id_plano, \
     id_bairro, pppoe, data_instalacao, dia_vencimento, id_legado, id_cliente, id_material";

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Filtros da listagem do financeiro; usados na contagem e na página.
    fn apply_filter<'a>(query: TableQuery<'a>, filter: &ContractFilter) -> TableQuery<'a> {
        let query = query.ilike("c.pppoe", filter.search.as_deref());
        let query = match filter.status {
            ContractStatusFilter::All => query,
            ContractStatusFilter::Pendencia => query.is_true("c.pendencia"),
            ContractStatusFilter::Status(status) => query.eq("c.status", status),
        };
        query.when(filter.asaas_only, |q| q.not_null("cl.idasaas"))
    }
}

#[async_trait]
impl ContractTable for ContractRepository {
    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> Result<Page<ContractListing>, AppError> {
        let count_query = Self::apply_filter(
            TableQuery::new(
                "SELECT COUNT(*) FROM contratos c INNER JOIN clientes cl ON cl.id = c.id_cliente",
            ),
            filter,
        );
        let total: i64 = count_query
            .into_builder()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let data_query = Self::apply_filter(
            TableQuery::new(
                r#"
                SELECT c.id, c.created_at, c.pppoe, c.status, c.pendencia, c.id_legado,
                       c.dia_vencimento, cl.id AS id_cliente, cl.nome AS cliente_nome, cl.idasaas
                FROM contratos c
                INNER JOIN clientes cl ON cl.id = c.id_cliente
                "#,
            ),
            filter,
        )
        .order_by("c.created_at DESC, c.id DESC")
        .page(page);

        let items = data_query
            .into_builder()
            .build_query_as::<ContractListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(items, page, total))
    }

    async fn find_contract(&self, contract_id: i64) -> Result<Option<Contract>, AppError> {
        let sql = format!("SELECT {} FROM contratos WHERE id = $1", CONTRACT_COLUMNS);
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(contract_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contract)
    }

    async fn find_contract_by_pppoe(&self, pppoe: &str) -> Result<Option<Contract>, AppError> {
        let sql = format!("SELECT {} FROM contratos WHERE pppoe = $1", CONTRACT_COLUMNS);
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(pppoe)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contract)
    }

    async fn search_contracts(&self, term: &str, limit: i64) -> Result<Vec<ContractRef>, AppError> {
        let refs = TableQuery::new("SELECT id, pppoe FROM contratos")
            .ilike("pppoe", Some(term))
            .order_by("pppoe")
            .limit(limit)
            .into_builder()
            .build_query_as::<ContractRef>()
            .fetch_all(&self.pool)
            .await?;
        Ok(refs)
    }

    async fn set_pendencia(&self, contract_id: i64, pendencia: bool) -> Result<Option<Contract>, AppError> {
        let sql = format!(
            "UPDATE contratos SET pendencia = $2 WHERE id = $1 RETURNING {}",
            CONTRACT_COLUMNS
        );
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(contract_id)
            .bind(pendencia)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contract)
    }

    async fn set_status(
        &self,
        contract_id: i64,
        status: ContractStatus,
    ) -> Result<Option<Contract>, AppError> {
        let sql = format!(
            "UPDATE contratos SET status = $2 WHERE id = $1 RETURNING {}",
            CONTRACT_COLUMNS
        );
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(contract_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contract)
    }

    async fn find_client(&self, client_id: i64) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, nome, cpf_cnpj, rg, email, fonewhats, cep, status, idasaas
            FROM clientes
            WHERE id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    async fn document_data(&self, contract_id: i64) -> Result<Option<ContractDocumentData>, AppError> {
        let data = sqlx::query_as::<_, ContractDocumentData>(
            r#"
            SELECT c.id AS contract_id, c.pppoe, c.endereco, c.complemento, c.dia_vencimento,
                   c.data_instalacao,
                   cl.nome AS cliente_nome, cl.cpf_cnpj, cl.rg, cl.email, cl.fonewhats, cl.cep,
                   p.nome AS plano_nome, p.valor AS plano_valor,
                   b.nome AS bairro_nome, b.cidade
            FROM contratos c
            LEFT JOIN clientes cl ON cl.id = c.id_cliente
            LEFT JOIN planos p ON p.id = c.id_plano
            LEFT JOIN bairros b ON b.id = c.id_bairro
            WHERE c.id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(data)
    }
}
