// src/common/query_builder.rs

use chrono::NaiveDate;
use sqlx::{postgres::PgArguments, query::QueryAs, FromRow, Postgres};
use sqlx::postgres::PgRow;
use std::collections::BTreeSet;
use std::fmt::Write;
use thiserror::Error;
use uuid::Uuid;

/// Valor de parâmetro aceito pelas consultas de relatório.
/// Arrays vazios viram `None` (NULL no banco = sem restrição).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    TextArray(Option<Vec<String>>),
    UuidArray(Option<Vec<Uuid>>),
    Date(NaiveDate),
    Int(i64),
}

#[derive(Debug, Error, PartialEq)]
pub enum QueryBuildError {
    #[error("placeholder ${0} não tem parâmetro correspondente ({1} parâmetros)")]
    MissingParameter(usize, usize),

    #[error("parâmetro ${0} nunca é usado no SQL")]
    UnusedParameter(usize),

    #[error("placeholder inválido: ${0}")]
    InvalidPlaceholder(usize),
}

// ---
// Builder: controla a posição dos parâmetros ($1, $2, ...) automaticamente
// ---
#[derive(Debug, Default)]
pub struct ReportQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl ReportQuery {
    pub fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Registra o parâmetro e devolve o placeholder (`$n`) para reuso no SQL.
    pub fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    pub fn push_bind(&mut self, param: SqlParam) -> &mut Self {
        let placeholder = self.bind(param);
        self.sql.push_str(&placeholder);
        self
    }

    /// `AND (col IN filtro)`: lista vazia liga NULL e não restringe nada.
    pub fn push_text_filter(&mut self, column: &str, values: &[String]) -> &mut Self {
        let param = if values.is_empty() {
            None
        } else {
            Some(values.to_vec())
        };
        let p = self.bind(SqlParam::TextArray(param));
        let _ = write!(
            self.sql,
            " AND ({p}::text[] IS NULL OR {column} = ANY({p}::text[]))"
        );
        self
    }

    pub fn push_uuid_filter(&mut self, column: &str, values: &[Uuid]) -> &mut Self {
        let param = if values.is_empty() {
            None
        } else {
            Some(values.to_vec())
        };
        let p = self.bind(SqlParam::UuidArray(param));
        let _ = write!(
            self.sql,
            " AND ({p}::uuid[] IS NULL OR {column} = ANY({p}::uuid[]))"
        );
        self
    }

    /// Valida que os placeholders usados são exatamente $1..$n.
    pub fn finish(self) -> Result<BuiltQuery, QueryBuildError> {
        let used = placeholders(&self.sql);
        let count = self.params.len();

        if let Some(&zero) = used.iter().find(|&&n| n == 0) {
            return Err(QueryBuildError::InvalidPlaceholder(zero));
        }
        if let Some(&max) = used.iter().next_back() {
            if max > count {
                return Err(QueryBuildError::MissingParameter(max, count));
            }
        }
        if let Some(unused) = (1..=count).find(|n| !used.contains(n)) {
            return Err(QueryBuildError::UnusedParameter(unused));
        }

        tracing::debug!(params = count, sql = %self.sql, "consulta de relatório montada");

        Ok(BuiltQuery {
            sql: self.sql,
            params: self.params,
        })
    }
}

/// Índices de todos os `$n` presentes no texto (ignora literais entre aspas simples).
fn placeholders(sql: &str) -> BTreeSet<usize> {
    let mut found = BTreeSet::new();
    let mut chars = sql.chars().peekable();
    let mut in_literal = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' => in_literal = !in_literal,
            '$' if !in_literal => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(*d);
                    chars.next();
                }
                if let Ok(n) = digits.parse::<usize>() {
                    found.insert(n);
                }
            }
            _ => {}
        }
    }
    found
}

// ---
// Consulta pronta: SQL validado + parâmetros na ordem
// ---
#[derive(Debug)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let mut query = sqlx::query_as::<_, O>(&self.sql);
        for param in &self.params {
            query = match param.clone() {
                SqlParam::TextArray(v) => query.bind(v),
                SqlParam::UuidArray(v) => query.bind(v),
                SqlParam::Date(v) => query.bind(v),
                SqlParam::Int(v) => query.bind(v),
            };
        }
        query
    }
}
