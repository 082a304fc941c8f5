// src/controllers.rs
//
// Estado das telas (filtros, página, modais) sem renderização. Cada ação
// chama o serviço, atualiza o estado e deixa uma notificação para o usuário.

pub mod agenda;
pub mod estoque;
pub mod financeiro;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest, DEFAULT_ITEMS_PER_PAGE},
    },
    middleware::i18n::Locale,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::Success(message.into())
    }

    /// Registra o erro no log e monta a mensagem da tela.
    pub fn failure(context: &str, err: &AppError, locale: &Locale) -> Self {
        tracing::error!("{}: {:?}", context, err);
        Notification::Error(format!("{}: {}", context, err.user_message(locale)))
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(m) | Notification::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// Página atual e total de páginas da última consulta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: i64,
    pub total_pages: i64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self { page: 1, total_pages: 1 }
    }
}

impl PageCursor {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Limita a página ao intervalo conhecido. Devolve `false` se nada mudou.
    pub fn go_to(&mut self, page: i64) -> bool {
        let target = page.clamp(1, self.total_pages.max(1));
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn absorb<T>(&mut self, page: &Page<T>) {
        self.page = page.page;
        // A tela sempre mostra ao menos uma página.
        self.total_pages = page.total_pages.max(1);
    }
}
