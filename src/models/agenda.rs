// src/models/agenda.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const INSTALLATION_EVENT_TYPE: &str = "Instalação";
pub const DEFAULT_EVENT_COLOR: &str = "#3788d8";

fn default_color() -> Option<String> {
    Some(DEFAULT_EVENT_COLOR.to_string())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O nome do evento é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    pub datainicio: DateTime<Utc>,
    pub datafinal: DateTime<Utc>,
    pub tipo_evento: Option<String>,
    pub responsaveis: Vec<String>,
    pub horamarcada: bool,
    pub prioritario: bool,
    pub realizada: bool,
    pub parcial: bool,
    pub cancelado: bool,
    pub pppoe: Option<String>,
    pub cor: Option<String>,
}

/// Formulário de criação/edição de evento.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[validate(custom(function = "validate_not_blank"))]
    pub nome: String,
    pub descricao: Option<String>,
    #[validate(required(message = "A data inicial é obrigatória."))]
    pub datainicio: Option<DateTime<Utc>>,
    #[validate(required(message = "A data final é obrigatória."))]
    pub datafinal: Option<DateTime<Utc>>,
    pub tipo_evento: Option<String>,
    #[serde(default)]
    pub responsaveis: Vec<String>,
    #[serde(default)]
    pub horamarcada: bool,
    #[serde(default)]
    pub prioritario: bool,
    #[serde(default)]
    pub realizada: bool,
    #[serde(default)]
    pub parcial: bool,
    #[serde(default)]
    pub cancelado: bool,
    pub pppoe: Option<String>,
    #[serde(default = "default_color")]
    pub cor: Option<String>,
}

impl EventDraft {
    /// Formulário vazio do botão "novo evento".
    pub fn blank() -> Self {
        Self {
            nome: String::new(),
            descricao: None,
            datainicio: None,
            datafinal: None,
            tipo_evento: None,
            responsaveis: Vec::new(),
            horamarcada: true,
            prioritario: false,
            realizada: false,
            parcial: false,
            cancelado: false,
            pppoe: None,
            cor: default_color(),
        }
    }

    /// Evento de instalação com PPPoE vinculado agenda o contrato.
    pub fn schedules_contract(&self) -> Option<&str> {
        let pppoe = self.pppoe.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        (self.tipo_evento.as_deref() == Some(INSTALLATION_EVENT_TYPE)).then_some(pppoe)
    }
}

impl From<&AgendaEvent> for EventDraft {
    fn from(event: &AgendaEvent) -> Self {
        Self {
            nome: event.nome.clone(),
            descricao: event.descricao.clone(),
            datainicio: Some(event.datainicio),
            datafinal: Some(event.datafinal),
            tipo_evento: event.tipo_evento.clone(),
            responsaveis: event.responsaveis.clone(),
            horamarcada: event.horamarcada,
            prioritario: event.prioritario,
            realizada: event.realizada,
            parcial: event.parcial,
            cancelado: event.cancelado,
            pppoe: event.pppoe.clone(),
            cor: event.cor.clone(),
        }
    }
}

/// Novo intervalo após arrastar o evento no calendário.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDates {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStyle {
    Completed,
    Cancelled,
    Partial,
    Priority,
    Default,
}

impl EventStyle {
    /// Precedência: realizada > cancelado > parcial > prioritário.
    pub fn for_flags(realizada: bool, cancelado: bool, parcial: bool, prioritario: bool) -> Self {
        if realizada {
            EventStyle::Completed
        } else if cancelado {
            EventStyle::Cancelled
        } else if parcial {
            EventStyle::Partial
        } else if prioritario {
            EventStyle::Priority
        } else {
            EventStyle::Default
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            EventStyle::Completed => "bg-gray-200 text-gray-800",
            EventStyle::Cancelled => "bg-red-100 text-red-800",
            EventStyle::Partial => "bg-yellow-100 text-yellow-800",
            EventStyle::Priority => "bg-orange-100 text-orange-800",
            EventStyle::Default => "",
        }
    }
}

/// Evento no formato do componente de calendário.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub color: Option<String>,
    pub tipo_evento: Option<String>,
    pub pppoe: Option<String>,
    pub horamarcada: bool,
    pub prioritario: bool,
    pub realizada: bool,
    pub parcial: bool,
    pub cancelado: bool,
    pub style: EventStyle,
    pub class_name: String,
}

impl From<&AgendaEvent> for CalendarEvent {
    fn from(event: &AgendaEvent) -> Self {
        let style = EventStyle::for_flags(
            event.realizada,
            event.cancelado,
            event.parcial,
            event.prioritario,
        );
        let responsible = (!event.responsaveis.is_empty()).then(|| event.responsaveis.join(", "));

        Self {
            id: event.id,
            title: event.nome.clone(),
            start: event.datainicio,
            end: event.datafinal,
            all_day: !event.horamarcada,
            description: event.descricao.clone(),
            responsible,
            color: event.cor.clone(),
            tipo_evento: event.tipo_evento.clone(),
            pppoe: event.pppoe.clone(),
            horamarcada: event.horamarcada,
            prioritario: event.prioritario,
            realizada: event.realizada,
            parcial: event.parcial,
            cancelado: event.cancelado,
            style,
            class_name: style.css_class().to_string(),
        }
    }
}

// --- Instalação ---

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: i64,
    pub id_agenda: i64,
    pub id_contrato: Option<i64>,
    pub id_user: Uuid,
    pub acompanhante: Option<String>,
    pub relato: Option<String>,
    pub cto: Option<String>,
    pub porta: Option<String>,
    pub data_instalacao: DateTime<Utc>,
}

/// Formulário preenchido pelo técnico ao concluir a instalação.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallationForm {
    pub material_id: Option<i64>,
    #[validate(length(max = 200, message = "Nome do acompanhante muito longo."))]
    pub acompanhante: Option<String>,
    pub relato: Option<String>,
    pub cto: Option<String>,
    pub porta: Option<String>,
    pub data_instalacao: Option<DateTime<Utc>>,
}

/// Todas as escritas da conclusão, já resolvidas, aplicadas numa única transação.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationPlan {
    pub event_id: i64,
    pub contract_id: Option<i64>,
    pub client_id: Option<i64>,
    pub material_id: Option<i64>,
    pub user_id: Uuid,
    pub acompanhante: Option<String>,
    pub relato: Option<String>,
    pub cto: Option<String>,
    pub porta: Option<String>,
    pub installed_at: DateTime<Utc>,
}

/// Cliente do contrato vinculado ao evento (cabeçalho do modal de instalação).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventClient {
    pub contrato_id: i64,
    pub pppoe: Option<String>,
    pub cliente_id: Option<i64>,
    pub cliente_nome: Option<String>,
}
