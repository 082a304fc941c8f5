use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para a ergonomia do `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Localização inválida: {0}")]
    InvalidLocation(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não autenticado")]
    Unauthorized,

    #[error("Contrato não encontrado: {0}")]
    ContractNotFound(String),

    #[error("Material não encontrado: {0}")]
    MaterialNotFound(i64),

    #[error("Evento não encontrado: {0}")]
    EventNotFound(i64),

    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("Transição de contrato inválida: {0}")]
    InvalidContractTransition(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar o PDF: {0}")]
    PdfError(String),
}

/// Corpo de erro devolvido pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidLocation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken | AppError::Unauthorized | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ContractNotFound(_)
            | AppError::MaterialNotFound(_)
            | AppError::EventNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidContractTransition(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::FontNotFound(_)
            | AppError::PdfError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exibida ao usuário (a notificação da tela).
    pub fn user_message(&self, locale: &Locale) -> String {
        let en = locale.is_english();
        match self {
            AppError::ValidationError(_) => pick(en, "One or more fields are invalid.", "Um ou mais campos são inválidos."),
            AppError::InvalidLocation(msg) => msg.clone(),
            AppError::InvalidToken => pick(en, "Invalid or missing authentication token.", "Token de autenticação inválido ou ausente."),
            AppError::Unauthorized => pick(en, "User not authenticated.", "Usuário não autenticado."),
            AppError::ContractNotFound(key) => {
                if en { format!("Contract not found: {}", key) } else { format!("Contrato não encontrado: {}", key) }
            }
            AppError::MaterialNotFound(id) => {
                if en { format!("Material {} not found.", id) } else { format!("Material {} não encontrado.", id) }
            }
            AppError::EventNotFound(id) => {
                if en { format!("Event {} not found.", id) } else { format!("Evento {} não encontrado.", id) }
            }
            AppError::NotFound(what) => {
                if en { format!("Not found: {}", what) } else { format!("Registro não encontrado: {}", what) }
            }
            AppError::InvalidContractTransition(msg) => msg.clone(),
            _ => pick(en, "An unexpected error occurred.", "Ocorreu um erro inesperado."),
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, nunca na resposta.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| Value::String(m.to_string())))
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.user_message(locale),
            details,
        }
    }
}

fn pick(en: bool, english: &str, portuguese: &str) -> String {
    if en { english.to_string() } else { portuguese.to_string() }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "O nome é obrigatório."))]
        nome: String,
    }

    #[tokio::test]
    async fn validation_errors_carry_field_details() {
        let errors = Form { nome: String::new() }.validate().unwrap_err();
        let response = AppError::from(errors).to_api_error(&Locale::default()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["details"]["nome"][0], "O nome é obrigatório.");
    }

    #[test]
    fn not_found_messages_follow_locale() {
        let err = AppError::ContractNotFound("cliente01".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(&Locale("en".into())), "Contract not found: cliente01");
        assert_eq!(err.user_message(&Locale::default()), "Contrato não encontrado: cliente01");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool timed out"));
        let api = err.to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }
}
