// src/models/filters.rs

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// ---
// Intervalo de datas: [inicio | null, fim | null]
// ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(Option<String>, Option<String>)")]
pub struct DateRange(pub Option<NaiveDate>, pub Option<NaiveDate>);

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.0.is_none() && self.1.is_none()
    }
}

/// Aceita "2024-01-31" e também ISO completo ("2024-01-31T23:00:00.000Z").
/// O ISO completo vale pela data no próprio offset (UTC para "Z"): meia-noite
/// local em CET chega como "…T23:00:00.000Z" e fica no dia anterior.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| format!("date invalide : {raw}"))
}

impl TryFrom<(Option<String>, Option<String>)> for DateRange {
    type Error = String;

    fn try_from((start, end): (Option<String>, Option<String>)) -> Result<Self, Self::Error> {
        let start = start.filter(|s| !s.trim().is_empty()).map(|s| parse_iso_date(&s)).transpose()?;
        let end = end.filter(|s| !s.trim().is_empty()).map(|s| parse_iso_date(&s)).transpose()?;
        Ok(DateRange(start, end))
    }
}

fn validate_date_order(range: &DateRange) -> Result<(), ValidationError> {
    if let DateRange(Some(start), Some(end)) = range {
        if start > end {
            let mut err = ValidationError::new("date_order");
            err.message = Some("La date de début doit précéder la date de fin.".into());
            return Err(err);
        }
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_ean13_list(codes: &Vec<String>) -> Result<(), ValidationError> {
    let invalid = codes
        .iter()
        .any(|code| code.len() != 13 || !code.chars().all(|c| c.is_ascii_digit()));
    if invalid {
        let mut err = ValidationError::new("ean13");
        err.message = Some("Chaque code EAN13 doit contenir 13 chiffres.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Estado dos filtros do dashboard (corpo dos POST)
// ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub distributors: Vec<String>,
    pub brands: Vec<String>,
    pub universes: Vec<String>,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub families: Vec<String>,
    pub sub_families: Vec<String>,
    pub specificities: Vec<String>,
    pub ranges: Vec<String>,
    pub pharmacies: Vec<Uuid>,

    #[validate(custom(function = "validate_ean13_list"))]
    pub ean13_products: Vec<String>,

    #[validate(custom(function = "validate_date_order"))]
    #[schema(value_type = Vec<Option<String>>)]
    pub date_range: DateRange,

    #[validate(custom(function = "validate_date_order"))]
    #[schema(value_type = Vec<Option<String>>)]
    pub comparison_date_range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Current,
    Comparison,
}

impl WindowKind {
    /// Valor da coluna `type` nas consultas.
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Current => "current",
            WindowKind::Comparison => "comparison",
        }
    }
}

/// Janela de tempo fechada [start, end].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub kind: WindowKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterState {
    /// Algum filtro de segmentação/farmácia/produto está ativo?
    pub fn has_active_filter(&self) -> bool {
        [
            &self.distributors,
            &self.brands,
            &self.universes,
            &self.categories,
            &self.sub_categories,
            &self.families,
            &self.sub_families,
            &self.specificities,
            &self.ranges,
            &self.ean13_products,
        ]
        .iter()
        .any(|values| !values.is_empty())
            || !self.pharmacies.is_empty()
    }

    pub fn current_window(&self) -> Result<ReportWindow, AppError> {
        match self.date_range {
            DateRange(Some(start), Some(end)) => Ok(ReportWindow {
                kind: WindowKind::Current,
                start,
                end,
            }),
            _ => Err(AppError::MissingDateRange),
        }
    }

    pub fn comparison_window(&self) -> Result<Option<ReportWindow>, AppError> {
        if self.comparison_date_range.is_empty() {
            return Ok(None);
        }
        match self.comparison_date_range {
            DateRange(Some(start), Some(end)) => Ok(Some(ReportWindow {
                kind: WindowKind::Comparison,
                start,
                end,
            })),
            _ => Err(AppError::IncompleteComparisonRange),
        }
    }

    /// Janela atual (obrigatória) seguida da janela de comparação (opcional).
    pub fn windows(&self) -> Result<Vec<ReportWindow>, AppError> {
        let mut windows = vec![self.current_window()?];
        if let Some(comparison) = self.comparison_window()? {
            windows.push(comparison);
        }
        Ok(windows)
    }
}

// ---
// Corpo padrão dos endpoints POST: { "filters": { ... } }
// ---
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ReportRequest {
    #[validate(nested)]
    pub filters: FilterState,
}

// ---
// Os mesmos filtros via query string (endpoints GET)
// ---
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    pub distributors: Vec<String>,
    pub brands: Vec<String>,
    pub universes: Vec<String>,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub families: Vec<String>,
    pub sub_families: Vec<String>,
    pub specificities: Vec<String>,
    pub ranges: Vec<String>,
    pub pharmacies: Vec<Uuid>,
    #[validate(custom(function = "validate_ean13_list"))]
    pub ean13_products: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub comparison_start_date: Option<String>,
    pub comparison_end_date: Option<String>,
}

impl FilterQuery {
    pub fn into_filters(self) -> Result<FilterState, AppError> {
        let date_range = DateRange::try_from((self.start_date, self.end_date))
            .map_err(AppError::InvalidQuery)?;
        let comparison_date_range =
            DateRange::try_from((self.comparison_start_date, self.comparison_end_date))
                .map_err(AppError::InvalidQuery)?;

        let filters = FilterState {
            distributors: self.distributors,
            brands: self.brands,
            universes: self.universes,
            categories: self.categories,
            sub_categories: self.sub_categories,
            families: self.families,
            sub_families: self.sub_families,
            specificities: self.specificities,
            ranges: self.ranges,
            pharmacies: self.pharmacies,
            ean13_products: self.ean13_products,
            date_range,
            comparison_date_range,
        };
        filters.validate()?;
        Ok(filters)
    }
}
