pub mod financeiro;
pub mod documents;
pub mod estoque;
pub mod agenda;

use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// Erro de validação de um único campo vindo da query string.
pub(crate) fn invalid_field(field: &'static str, message: &'static str) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new("invalid").with_message(message.into()));
    AppError::ValidationError(errors)
}
