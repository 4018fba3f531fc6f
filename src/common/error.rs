use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::I18nStore;
use crate::common::query_builder::QueryBuildError;
use crate::middleware::i18n::Locale;

// Erros de domínio. A mensagem do #[error] é para o log; o usuário vê a
// mensagem traduzida (I18nStore).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error("Parâmetros de consulta inválidos: {0}")]
    InvalidQuery(String),

    #[error("Intervalo de datas obrigatório")]
    MissingDateRange,

    #[error("Intervalo de comparação incompleto")]
    IncompleteComparisonRange,

    #[error("Dimensão desconhecida: {0}")]
    UnknownDimension(String),

    #[error("Coluna de ordenação desconhecida: {0}")]
    UnknownSortColumn(String),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(String),

    #[error("Consulta mal montada: {0}")]
    QueryBuild(#[from] QueryBuildError),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// ---
// Resposta HTTP: sempre { "error": "...", "details"?: {...} }
// ---
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
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::InvalidQuery(_)
            | AppError::MissingDateRange
            | AppError::IncompleteComparisonRange
            | AppError::UnknownDimension(_)
            | AppError::UnknownSortColumn(_) => StatusCode::BAD_REQUEST,
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            AppError::QueryBuild(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let (key, value, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = Map::new();
                flatten_validation_errors("", errors, &mut details);
                ("error.validation", None, Some(Value::Object(details)))
            }
            AppError::InvalidBody(reason) => (
                "error.invalid_body",
                None,
                Some(json!({ "reason": reason })),
            ),
            AppError::InvalidQuery(reason) => (
                "error.invalid_query",
                None,
                Some(json!({ "reason": reason })),
            ),
            AppError::MissingDateRange => ("error.missing_date_range", None, None),
            AppError::IncompleteComparisonRange => ("error.incomplete_comparison_range", None, None),
            AppError::UnknownDimension(name) => ("error.unknown_dimension", Some(name.as_str()), None),
            AppError::UnknownSortColumn(name) => ("error.unknown_sort_column", Some(name.as_str()), None),
            AppError::ProductNotFound(code) => ("error.product_not_found", Some(code.as_str()), None),

            // Todo o resto vira 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ("error.internal", None, None)
            }
        };

        ApiError {
            status,
            error: store.translate(locale, key, value),
            details,
        }
    }
}

// Sem contexto de idioma (ex.: fallback do router) usamos o catálogo padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::new())
            .into_response()
    }
}

// filters.dateRange -> ["mensagem"], inclusive para structs aninhadas e listas.
fn flatten_validation_errors(prefix: &str, errors: &ValidationErrors, out: &mut Map<String, Value>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<Value> = field_errors
                    .iter()
                    .map(|e| {
                        let text = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string());
                        Value::String(text)
                    })
                    .collect();
                out.insert(path, Value::Array(messages));
            }
            ValidationErrorsKind::Struct(nested) => flatten_validation_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_validation_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}
