// src/common/search.rs

use std::future::Future;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};

use crate::{common::error::AppError, middleware::i18n::Locale};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// Máximo de sugestões nas buscas enquanto digita.
pub const SEARCH_RESULT_LIMIT: i64 = 10;

/// Ficha de geração de uma requisição de busca.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Numera as requisições; só a resposta da mais recente é aplicada.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Devolve o valor apenas se nenhuma requisição mais nova foi emitida.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    pub term: String,
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for SearchOutcome<T> {
    fn default() -> Self {
        Self {
            term: String::new(),
            items: Vec::new(),
            error: None,
        }
    }
}

/// Campo de busca enquanto o usuário digita: espera `delay` sem novas teclas,
/// dispara a consulta e publica o resultado se ainda for o mais recente.
pub struct LiveSearch<T> {
    delay: Duration,
    locale: Locale,
    sequencer: RequestSequencer,
    timer: Option<JoinHandle<()>>,
    tx: watch::Sender<SearchOutcome<T>>,
}

impl<T> LiveSearch<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Erros da consulta viram a mensagem de usuário no idioma `locale`.
    pub fn new(delay: Duration, locale: Locale) -> Self {
        let (tx, _rx) = watch::channel(SearchOutcome::default());
        Self {
            delay,
            locale,
            sequencer: RequestSequencer::new(),
            timer: None,
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome<T>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SearchOutcome<T> {
        self.tx.borrow().clone()
    }

    /// Registra uma tecla. Cancela apenas o temporizador pendente; uma consulta
    /// já disparada segue até o fim e tem a resposta descartada se ficou velha.
    pub fn input<F, Fut>(&mut self, term: &str, fetch: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, AppError>> + Send + 'static,
    {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let term = term.trim().to_string();
        if term.is_empty() {
            // Invalida qualquer resposta em voo.
            self.sequencer.issue();
            self.tx.send_replace(SearchOutcome::default());
            return;
        }

        let delay = self.delay;
        let locale = self.locale.clone();
        let sequencer = self.sequencer.clone();
        let tx = self.tx.clone();

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let ticket = sequencer.issue();
            // A consulta roda fora do temporizador para não ser abortada junto com ele.
            tokio::spawn(async move {
                let outcome = match fetch(term.clone()).await {
                    Ok(items) => SearchOutcome { term, items, error: None },
                    Err(e) => {
                        tracing::warn!("Busca '{}' falhou: {:?}", term, e);
                        SearchOutcome { term, items: Vec::new(), error: Some(e.user_message(&locale)) }
                    }
                };

                if sequencer.is_current(ticket) {
                    tx.send_replace(outcome);
                } else {
                    tracing::debug!("Resposta de busca descartada (requisição mais nova em andamento)");
                }
            });
        }));
    }

    pub fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.sequencer.issue();
        self.tx.send_replace(SearchOutcome::default());
    }
}

impl<T> Drop for LiveSearch<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
