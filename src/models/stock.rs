// src/models/stock.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::metrics::{evolution_percent, round2, stock_break_rate};
use crate::models::filters::FilterState;

// --- 1. Estoque atual por produto (último inventário <= data) ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct StockProductRow {
    pub code_13_ref: String,
    pub name: Option<String>,
    pub brand_lab: Option<String>,
    pub stock_quantity: Decimal,
    pub stock_value: Decimal,
    pub pharmacy_count: i64,
}

// GET /api/stock-data
#[derive(Debug, Serialize, ToSchema)]
pub struct StockDataResponse {
    pub stock: Vec<StockProductRow>,
}

// --- 2. Estoque mensal (último inventário de cada produto no mês) ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct MonthlyStockRow {
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub period: String,
    pub month: String,
    pub stock_quantity: Decimal,
    pub stock_value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockMonthlyResponse {
    pub months: Vec<MonthlyStockRow>,
}

// --- 3. Rupturas (pedido x recebido) ---
#[derive(Debug, Clone, FromRow)]
pub struct StockBreakAggregateRow {
    #[sqlx(rename = "type")]
    pub period: String,
    pub group_key: Option<String>,
    pub group_label: Option<String>,
    pub ordered_quantity: Decimal,
    pub received_quantity: Decimal,
    pub break_quantity: Decimal,
    pub break_amount: Decimal,
    pub order_count: i64,
    pub products_in_break: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockBreakMetrics {
    #[serde(rename = "type")]
    pub period: String,
    pub ordered_quantity: Decimal,
    pub received_quantity: Decimal,
    pub break_quantity: Decimal,
    pub break_amount: Decimal,
    /// break_quantity / ordered_quantity * 100
    pub break_rate: Decimal,
    pub order_count: i64,
    pub products_in_break: i64,
}

impl From<&StockBreakAggregateRow> for StockBreakMetrics {
    fn from(row: &StockBreakAggregateRow) -> Self {
        Self {
            period: row.period.clone(),
            ordered_quantity: row.ordered_quantity,
            received_quantity: row.received_quantity,
            break_quantity: row.break_quantity,
            break_amount: round2(row.break_amount),
            break_rate: stock_break_rate(row.break_quantity, row.ordered_quantity),
            order_count: row.order_count,
            products_in_break: row.products_in_break,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockBreakEvolution {
    pub break_quantity: Decimal,
    pub break_amount: Decimal,
}

impl StockBreakEvolution {
    pub fn between(current: &StockBreakMetrics, previous: &StockBreakMetrics) -> Self {
        Self {
            break_quantity: evolution_percent(current.break_quantity, previous.break_quantity),
            break_amount: evolution_percent(current.break_amount, previous.break_amount),
        }
    }
}

// POST /api/stock-breaks
#[derive(Debug, Serialize, ToSchema)]
pub struct StockBreakSummaryResponse {
    pub summary: Vec<StockBreakMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution: Option<StockBreakEvolution>,
}

// POST /api/stock-breaks/products
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct StockBreakProductsRequest {
    #[validate(nested)]
    pub filters: FilterState,

    #[validate(range(min = 1, max = 500, message = "La limite doit être comprise entre 1 et 500."))]
    pub limit: i64,
}

impl Default for StockBreakProductsRequest {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockBreakProductRow {
    pub code_13_ref: String,
    pub name: String,
    #[serde(flatten)]
    pub metrics: StockBreakMetrics,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockBreakProductsResponse {
    pub products: Vec<StockBreakProductRow>,
}
