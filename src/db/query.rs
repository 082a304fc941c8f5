// src/db/query.rs

use sqlx::{Encode, Postgres, QueryBuilder, Type};

use crate::common::pagination::PageRequest;

/// `%termo%` para ILIKE, escapando os curingas digitados pelo usuário.
/// Termo vazio (ou só espaços) não filtra.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

/// SELECT com filtros opcionais, ordenação e janela de paginação.
/// A mesma sequência de filtros monta a consulta de dados e a de contagem.
pub struct TableQuery<'args> {
    builder: QueryBuilder<'args, Postgres>,
    has_where: bool,
}

impl<'args> TableQuery<'args> {
    pub fn new(select_from: &str) -> Self {
        Self {
            builder: QueryBuilder::new(select_from),
            has_where: false,
        }
    }

    fn condition(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.builder.push(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;
        &mut self.builder
    }

    pub fn eq<T>(mut self, column: &str, value: T) -> Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        self.condition().push(column).push(" = ").push_bind(value);
        self
    }

    pub fn eq_opt<T>(self, column: &str, value: Option<T>) -> Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    pub fn ilike(mut self, column: &str, term: Option<&str>) -> Self {
        if let Some(pattern) = contains_pattern(term) {
            self.condition().push(column).push(" ILIKE ").push_bind(pattern);
        }
        self
    }

    pub fn is_true(mut self, column: &str) -> Self {
        self.condition().push(column).push(" = TRUE");
        self
    }

    pub fn not_null(mut self, column: &str) -> Self {
        self.condition().push(column).push(" IS NOT NULL");
        self
    }

    pub fn when(self, apply: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if apply { f(self) } else { self }
    }

    pub fn order_by(mut self, clause: &str) -> Self {
        self.builder.push(" ORDER BY ").push(clause);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.builder.push(" LIMIT ").push_bind(limit);
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.builder
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        self
    }

    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub fn into_builder(self) -> QueryBuilder<'args, Postgres> {
        self.builder
    }
}
