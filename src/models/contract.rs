// src/models/contract.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o ENUM 'contract_status' do Postgres.
// Contrato sem status (NULL) ainda não entrou no ciclo de instalação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_status")]
pub enum ContractStatus {
    Ativo,
    Agendado,
    Bloqueado,
    Liberado48,
    Cancelado,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Ativo => "Ativo",
            ContractStatus::Agendado => "Agendado",
            ContractStatus::Bloqueado => "Bloqueado",
            ContractStatus::Liberado48 => "Liberado48",
            ContractStatus::Cancelado => "Cancelado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Ativo" => Some(ContractStatus::Ativo),
            "Agendado" => Some(ContractStatus::Agendado),
            "Bloqueado" => Some(ContractStatus::Bloqueado),
            "Liberado48" => Some(ContractStatus::Liberado48),
            "Cancelado" => Some(ContractStatus::Cancelado),
            _ => None,
        }
    }

    /// Agendar só vale para contrato sem status ou já agendado.
    pub fn can_schedule(current: Option<ContractStatus>) -> bool {
        matches!(current, None | Some(ContractStatus::Agendado))
    }

    pub fn can_activate(current: Option<ContractStatus>) -> bool {
        !matches!(current, Some(ContractStatus::Cancelado))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: Option<ContractStatus>,
    pub pendencia: bool,
    pub endereco: Option<String>,
    pub complemento: Option<String>,
    pub id_plano: Option<i64>,
    pub id_bairro: Option<i64>,
    pub pppoe: Option<String>,
    pub data_instalacao: Option<DateTime<Utc>>,
    pub dia_vencimento: Option<i32>,
    pub id_legado: Option<String>,
    pub id_cliente: Option<i64>,
    pub id_material: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub nome: String,
    pub cpf_cnpj: Option<String>,
    pub rg: Option<String>,
    pub email: Option<String>,
    pub fonewhats: Option<String>,
    pub cep: Option<String>,
    pub status: Option<String>,
    pub idasaas: Option<String>,
}

impl Client {
    /// Cliente com cobrança integrada ao Asaas.
    pub fn is_integrated(&self) -> bool {
        self.idasaas.is_some()
    }
}

/// Linha da listagem do financeiro (contrato + cliente).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractListing {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub pppoe: Option<String>,
    pub status: Option<ContractStatus>,
    pub pendencia: bool,
    pub id_legado: Option<String>,
    pub dia_vencimento: Option<i32>,
    pub id_cliente: i64,
    pub cliente_nome: String,
    pub idasaas: Option<String>,
}

impl ContractListing {
    pub fn integration_label(&self) -> &'static str {
        if self.idasaas.is_some() { "Integrado" } else { "Não integrado" }
    }
}

/// Filtro de status da tela do financeiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractStatusFilter {
    #[default]
    All,
    /// `pendencia = true`, qualquer que seja o status.
    Pendencia,
    Status(ContractStatus),
}

impl ContractStatusFilter {
    /// `""` = todos, `"pendencia"` = pendentes, senão um status exato.
    /// Valor desconhecido é rejeitado.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => Some(ContractStatusFilter::All),
            "pendencia" => Some(ContractStatusFilter::Pendencia),
            other => ContractStatus::parse(other).map(ContractStatusFilter::Status),
        }
    }

    pub fn matches(&self, status: Option<ContractStatus>, pendencia: bool) -> bool {
        match self {
            ContractStatusFilter::All => true,
            ContractStatusFilter::Pendencia => pendencia,
            ContractStatusFilter::Status(wanted) => status == Some(*wanted),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContractFilter {
    pub search: Option<String>,
    pub status: ContractStatusFilter,
    pub asaas_only: bool,
}

/// Referência curta usada nas buscas por PPPoE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractRef {
    pub id: i64,
    pub pppoe: Option<String>,
}

/// Dados achatados de contrato, cliente, plano e bairro para os documentos.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ContractDocumentData {
    pub contract_id: i64,
    pub pppoe: Option<String>,
    pub endereco: Option<String>,
    pub complemento: Option<String>,
    pub dia_vencimento: Option<i32>,
    pub data_instalacao: Option<DateTime<Utc>>,
    pub cliente_nome: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub rg: Option<String>,
    pub email: Option<String>,
    pub fonewhats: Option<String>,
    pub cep: Option<String>,
    pub plano_nome: Option<String>,
    pub plano_valor: Option<Decimal>,
    pub bairro_nome: Option<String>,
    pub cidade: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_only_from_blank_or_scheduled() {
        assert!(ContractStatus::can_schedule(None));
        assert!(ContractStatus::can_schedule(Some(ContractStatus::Agendado)));
        assert!(!ContractStatus::can_schedule(Some(ContractStatus::Ativo)));
        assert!(!ContractStatus::can_schedule(Some(ContractStatus::Bloqueado)));
        assert!(!ContractStatus::can_activate(Some(ContractStatus::Cancelado)));
        assert!(ContractStatus::can_activate(Some(ContractStatus::Agendado)));
    }

    #[test]
    fn pendencia_filter_ignores_status() {
        let filter = ContractStatusFilter::parse("pendencia").unwrap();
        assert!(filter.matches(Some(ContractStatus::Ativo), true));
        assert!(filter.matches(None, true));
        assert!(!filter.matches(Some(ContractStatus::Ativo), false));

        assert_eq!(ContractStatusFilter::parse(""), Some(ContractStatusFilter::All));
        assert_eq!(
            ContractStatusFilter::parse("Bloqueado"),
            Some(ContractStatusFilter::Status(ContractStatus::Bloqueado))
        );
        assert_eq!(ContractStatusFilter::parse("qualquer"), None);
    }
}
