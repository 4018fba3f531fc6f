// src/models/growth.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow)]
pub struct GrowthQuantityRow {
    pub group_key: String,
    pub current_quantity: Decimal,
    pub previous_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GrowthEntry {
    pub name: String,
    pub current_quantity: Decimal,
    pub previous_quantity: Decimal,
    /// (atual - anterior) / anterior * 100
    pub growth_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GrowthResponse {
    #[schema(value_type = Vec<String>)]
    pub current_period: [NaiveDate; 2],
    #[schema(value_type = Vec<String>)]
    pub previous_period: [NaiveDate; 2],
    pub ranking: Vec<GrowthEntry>,
}
