// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

// --- 1. Tipos de material (ENUM 'material_tipo') ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "material_tipo")]
pub enum MaterialTipo {
    Roteador,
    Onu,
    Cabo,
    Switch,
    Outros,
}

// --- 2. Tipo de localização (ENUM 'localizacao_tipo') ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "localizacao_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Empresa,
    Veiculo,
    Contrato,
}

/// Destino de uma movimentação. Cada variante carrega exatamente a referência que precisa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTarget {
    Empresa,
    Veiculo(i64),
    Contrato(i64),
}

impl LocationTarget {
    /// Monta o destino a partir do formato do banco/JSON (tipo + referências opcionais).
    pub fn from_parts(
        kind: LocationKind,
        veiculo_id: Option<i64>,
        contrato_id: Option<i64>,
    ) -> Result<Self, AppError> {
        match (kind, veiculo_id, contrato_id) {
            (LocationKind::Empresa, None, None) => Ok(LocationTarget::Empresa),
            (LocationKind::Veiculo, Some(id), None) => Ok(LocationTarget::Veiculo(id)),
            (LocationKind::Contrato, None, Some(id)) => Ok(LocationTarget::Contrato(id)),
            (LocationKind::Veiculo, None, _) => Err(AppError::InvalidLocation(
                "Selecione o veículo de destino.".into(),
            )),
            (LocationKind::Contrato, _, None) => Err(AppError::InvalidLocation(
                "Selecione o contrato de destino.".into(),
            )),
            _ => Err(AppError::InvalidLocation(
                "A localização deve referenciar apenas o destino do seu tipo.".into(),
            )),
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            LocationTarget::Empresa => LocationKind::Empresa,
            LocationTarget::Veiculo(_) => LocationKind::Veiculo,
            LocationTarget::Contrato(_) => LocationKind::Contrato,
        }
    }

    pub fn veiculo_id(&self) -> Option<i64> {
        match self {
            LocationTarget::Veiculo(id) => Some(*id),
            _ => None,
        }
    }

    pub fn contrato_id(&self) -> Option<i64> {
        match self {
            LocationTarget::Contrato(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_empresa(&self) -> bool {
        matches!(self, LocationTarget::Empresa)
    }
}

// --- 3. Histórico de localização (somente inserção) ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: i64,
    pub material_id: i64,
    pub localizacao_tipo: LocationKind,
    pub veiculo_id: Option<i64>,
    pub contrato_id: Option<i64>,
    pub empresa: bool,
    pub data_atualizacao: DateTime<Utc>,
}

impl LocationRecord {
    pub fn target(&self) -> Result<LocationTarget, AppError> {
        LocationTarget::from_parts(self.localizacao_tipo, self.veiculo_id, self.contrato_id)
    }
}

/// Registro de localização com a placa/PPPoE do destino, para exibição.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: LocationRecord,
    pub veiculo_placa: Option<String>,
    pub contrato_pppoe: Option<String>,
}

impl LocationDetail {
    pub fn label(&self) -> String {
        match self.record.localizacao_tipo {
            LocationKind::Empresa => "Empresa".to_string(),
            LocationKind::Veiculo => {
                format!("Veículo: {}", self.veiculo_placa.as_deref().unwrap_or_default())
            }
            LocationKind::Contrato => {
                format!("Contrato: {}", self.contrato_pppoe.as_deref().unwrap_or_default())
            }
        }
    }
}

/// Material sem nenhum registro é exibido como "Empresa".
pub fn location_label(location: Option<&LocationDetail>) -> String {
    location.map(LocationDetail::label).unwrap_or_else(|| "Empresa".to_string())
}

// --- 4. Materiais, modelos e veículos ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: i64,
    pub serialnb: String,
    pub tipo: MaterialTipo,
    pub id_modelo: Option<i64>,
    pub etiqueta: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialModel {
    pub id: i64,
    pub nome: String,
    pub marca: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub placa: String,
    pub nome: Option<String>,
}

/// Linha da lista de materiais, já com o modelo e a localização atual.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOverview {
    #[serde(flatten)]
    pub material: Material,
    pub modelo: Option<MaterialModel>,
    pub localizacao: Option<LocationDetail>,
    pub localizacao_label: String,
}

/// Quantidade de materiais por modelo (visão sem modelo selecionado).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub id: i64,
    pub nome: String,
    pub marca: String,
    pub quantidade: i64,
    pub tipo: MaterialTipo,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub id_modelo: i64,
    pub serial: Option<String>,
    pub tipo: Option<MaterialTipo>,
    pub etiqueta: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub nome: Option<String>,
    pub marca: Option<String>,
}

// --- 5. Payloads de escrita ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraft {
    #[validate(length(min = 1, message = "O número de série é obrigatório."))]
    pub serialnb: String,
    pub tipo: MaterialTipo,
    pub id_modelo: Option<i64>,
    pub etiqueta: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelDraft {
    #[validate(length(min = 1, message = "O nome do modelo é obrigatório."))]
    pub nome: String,
    #[validate(length(min = 1, message = "A marca é obrigatória."))]
    pub marca: String,
}

/// Formulário de movimentação, no mesmo formato da tabela.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveMaterialPayload {
    pub localizacao_tipo: LocationKind,
    pub veiculo_id: Option<i64>,
    pub contrato_id: Option<i64>,
}

impl MoveMaterialPayload {
    pub fn target(&self) -> Result<LocationTarget, AppError> {
        LocationTarget::from_parts(self.localizacao_tipo, self.veiculo_id, self.contrato_id)
    }
}
