// src/models/sales.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    metrics::{average, evolution_percent, percentage, round2},
    sorting::{SortCell, SortDirection, SortableRow},
};

// 1. Linha crua vinda do banco (uma por janela e chave de agrupamento)
#[derive(Debug, Clone, FromRow)]
pub struct SalesAggregateRow {
    #[sqlx(rename = "type")]
    pub period: String,
    pub group_key: Option<String>,
    pub group_label: Option<String>,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub revenue_ht: Decimal,
    pub purchase_cost: Decimal,
    pub product_count: i64,
    pub pharmacy_count: i64,
}

// 2. Métricas de vendas de um período (com derivadas já calculadas)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalesMetrics {
    #[serde(rename = "type")]
    pub period: String,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub revenue_ht: Decimal,
    pub purchase_cost: Decimal,
    pub margin: Decimal,
    pub margin_percentage: Decimal,
    pub average_selling_price: Decimal,
    pub average_purchase_price: Decimal,
    pub product_count: i64,
    pub pharmacy_count: i64,
}

impl SalesMetrics {
    /// Margem com IVA deduzido: CA HT - custo de compra.
    pub fn from_row(row: &SalesAggregateRow) -> Self {
        let margin = row.revenue_ht - row.purchase_cost;
        Self {
            period: row.period.clone(),
            total_quantity: row.total_quantity,
            revenue: round2(row.revenue),
            revenue_ht: round2(row.revenue_ht),
            purchase_cost: round2(row.purchase_cost),
            margin: round2(margin),
            margin_percentage: percentage(margin, row.revenue_ht),
            average_selling_price: average(row.revenue, row.total_quantity),
            average_purchase_price: average(row.purchase_cost, row.total_quantity),
            product_count: row.product_count,
            pharmacy_count: row.pharmacy_count,
        }
    }

    pub fn empty(period: &str) -> Self {
        Self {
            period: period.to_string(),
            total_quantity: Decimal::ZERO,
            revenue: Decimal::ZERO,
            revenue_ht: Decimal::ZERO,
            purchase_cost: Decimal::ZERO,
            margin: Decimal::ZERO,
            margin_percentage: Decimal::ZERO,
            average_selling_price: Decimal::ZERO,
            average_purchase_price: Decimal::ZERO,
            product_count: 0,
            pharmacy_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalesEvolution {
    pub quantity: Decimal,
    pub revenue: Decimal,
    pub margin: Decimal,
}

impl SalesEvolution {
    pub fn between(current: &SalesMetrics, previous: &SalesMetrics) -> Self {
        Self {
            quantity: evolution_percent(current.total_quantity, previous.total_quantity),
            revenue: evolution_percent(current.revenue, previous.revenue),
            margin: evolution_percent(current.margin, previous.margin),
        }
    }
}

// POST /api/sales/summary
#[derive(Debug, Serialize, ToSchema)]
pub struct SalesSummaryResponse {
    pub summary: Vec<SalesMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution: Option<SalesEvolution>,
}

// 3. Linha "plana" por chave de agrupamento (tabelas do dashboard)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DimensionRow {
    pub key: String,
    pub label: String,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub margin: Decimal,
    pub margin_percentage: Decimal,
    pub average_selling_price: Decimal,
    pub pharmacy_count: i64,
    pub comparison_quantity: Decimal,
    pub comparison_revenue: Decimal,
    pub comparison_margin: Decimal,
    pub quantity_evolution: Decimal,
    pub revenue_evolution: Decimal,
    pub margin_evolution: Decimal,
}

impl DimensionRow {
    pub fn new(key: String, label: String, current: &SalesMetrics, comparison: &SalesMetrics) -> Self {
        let evolution = SalesEvolution::between(current, comparison);
        Self {
            key,
            label,
            total_quantity: current.total_quantity,
            revenue: current.revenue,
            margin: current.margin,
            margin_percentage: current.margin_percentage,
            average_selling_price: current.average_selling_price,
            pharmacy_count: current.pharmacy_count,
            comparison_quantity: comparison.total_quantity,
            comparison_revenue: comparison.revenue,
            comparison_margin: comparison.margin,
            quantity_evolution: evolution.quantity,
            revenue_evolution: evolution.revenue,
            margin_evolution: evolution.margin,
        }
    }
}

impl SortableRow for DimensionRow {
    const SORTABLE_COLUMNS: &'static [&'static str] = &[
        "key",
        "label",
        "total_quantity",
        "revenue",
        "margin",
        "margin_percentage",
        "average_selling_price",
        "pharmacy_count",
        "comparison_quantity",
        "comparison_revenue",
        "comparison_margin",
        "quantity_evolution",
        "revenue_evolution",
        "margin_evolution",
    ];

    fn sort_cell(&self, column: &str) -> SortCell<'_> {
        match column {
            "key" => SortCell::Text(&self.key),
            "label" if self.label.is_empty() => SortCell::Empty,
            "label" => SortCell::Text(&self.label),
            "total_quantity" => SortCell::Number(self.total_quantity),
            "revenue" => SortCell::Number(self.revenue),
            "margin" => SortCell::Number(self.margin),
            "margin_percentage" => SortCell::Number(self.margin_percentage),
            "average_selling_price" => SortCell::Number(self.average_selling_price),
            "pharmacy_count" => SortCell::Number(Decimal::from(self.pharmacy_count)),
            "comparison_quantity" => SortCell::Number(self.comparison_quantity),
            "comparison_revenue" => SortCell::Number(self.comparison_revenue),
            "comparison_margin" => SortCell::Number(self.comparison_margin),
            "quantity_evolution" => SortCell::Number(self.quantity_evolution),
            "revenue_evolution" => SortCell::Number(self.revenue_evolution),
            "margin_evolution" => SortCell::Number(self.margin_evolution),
            _ => SortCell::Empty,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DimensionResponse {
    pub dimension: String,
    pub rows: Vec<DimensionRow>,
}

// GET /api/sales
#[derive(Debug, Serialize, ToSchema)]
pub struct SalesTableResponse {
    pub sales: Vec<DimensionRow>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub sort_dir: SortDirection,
}

// 4. Treemap universo -> categoria (GROUP BY ROLLUP)
#[derive(Debug, Clone, FromRow)]
pub struct SegmentRollupRow {
    pub universe: Option<String>,
    pub category: Option<String>,
    /// 0 = folha (universo+categoria), 1 = subtotal do universo, 3 = total geral
    pub grouping_level: i32,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub revenue_ht: Decimal,
    pub purchase_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SegmentNode {
    pub name: String,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub margin: Decimal,
    #[schema(no_recursion)]
    pub children: Vec<SegmentNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentTreeResponse {
    pub tree: SegmentNode,
}
