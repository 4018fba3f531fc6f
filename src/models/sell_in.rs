// src/models/sell_in.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::metrics::{evolution_percent, round2};

#[derive(Debug, Clone, FromRow)]
pub struct SellInAggregateRow {
    #[sqlx(rename = "type")]
    pub period: String,
    pub group_key: Option<String>,
    pub group_label: Option<String>,
    pub ordered_quantity: Decimal,
    pub free_quantity: Decimal,
    pub received_quantity: Decimal,
    pub purchase_amount: Decimal,
    pub order_count: i64,
    pub product_count: i64,
}

// Compras de um período (ou de um mês, quando `month` vem preenchido)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SellInMetrics {
    #[serde(rename = "type")]
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub ordered_quantity: Decimal,
    pub free_quantity: Decimal,
    pub received_quantity: Decimal,
    pub purchase_amount: Decimal,
    pub order_count: i64,
    pub product_count: i64,
}

impl From<SellInAggregateRow> for SellInMetrics {
    fn from(row: SellInAggregateRow) -> Self {
        Self {
            period: row.period,
            month: row.group_key,
            ordered_quantity: row.ordered_quantity,
            free_quantity: row.free_quantity,
            received_quantity: row.received_quantity,
            purchase_amount: round2(row.purchase_amount),
            order_count: row.order_count,
            product_count: row.product_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SellInEvolution {
    pub ordered_quantity: Decimal,
    pub purchase_amount: Decimal,
}

impl SellInEvolution {
    pub fn between(current: &SellInMetrics, previous: &SellInMetrics) -> Self {
        Self {
            ordered_quantity: evolution_percent(current.ordered_quantity, previous.ordered_quantity),
            purchase_amount: evolution_percent(current.purchase_amount, previous.purchase_amount),
        }
    }
}

// GET /api/sell-in/summary
#[derive(Debug, Serialize, ToSchema)]
pub struct SellInSummaryResponse {
    pub summary: Vec<SellInMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution: Option<SellInEvolution>,
}

// GET /api/sell-in/monthly
#[derive(Debug, Serialize, ToSchema)]
pub struct SellInMonthlyResponse {
    pub months: Vec<SellInMetrics>,
}
