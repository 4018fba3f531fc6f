// src/models/trend.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Linhas com chave de mês "YYYY-MM".
pub trait MonthKeyed {
    fn month(&self) -> &str;
}

// =============================================================================
//  VENDAS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySalesPoint {
    pub month: String,
    pub total_quantity: Decimal,
    pub revenue: Decimal,
    pub margin: Decimal,
}

impl MonthKeyed for MonthlySalesPoint {
    fn month(&self) -> &str {
        &self.month
    }
}

/// Totais e médias mensais de um "balde" (ano atual, ano anterior, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SalesBucket {
    pub months: Vec<MonthlySalesPoint>,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
    pub total_margin: Decimal,
    pub average_quantity: Decimal,
    pub average_revenue: Decimal,
    pub average_margin: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct YearToDateEvolution {
    pub quantity: Decimal,
    pub revenue: Decimal,
    pub margin: Decimal,
}

// POST /api/sales/yearly-trend
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SalesTrendResponse {
    pub reference_date: Option<NaiveDate>,
    pub current_year: SalesBucket,
    pub previous_year: SalesBucket,
    /// Ano anterior limitado aos mesmos meses já decorridos no ano atual
    pub previous_year_to_date: SalesBucket,
    pub evolution: YearToDateEvolution,
}

// =============================================================================
//  RUPTURAS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyStockBreakPoint {
    pub month: String,
    pub ordered_quantity: Decimal,
    pub break_quantity: Decimal,
    pub break_rate: Decimal,
}

impl MonthKeyed for MonthlyStockBreakPoint {
    fn month(&self) -> &str {
        &self.month
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StockBreakBucket {
    pub months: Vec<MonthlyStockBreakPoint>,
    pub ordered_quantity: Decimal,
    pub break_quantity: Decimal,
    pub break_rate: Decimal,
    pub average_break_quantity: Decimal,
}

// POST /api/stock-breaks/yearly-trend
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct StockBreakTrendResponse {
    pub reference_date: Option<NaiveDate>,
    pub current_year: StockBreakBucket,
    pub previous_year: StockBreakBucket,
    pub previous_year_to_date: StockBreakBucket,
    pub break_quantity_evolution: Decimal,
}

// =============================================================================
//  PREVISÃO
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastMonth {
    pub month: String,
    /// Preenchido para meses já decorridos
    pub actual_quantity: Option<Decimal>,
    pub actual_revenue: Option<Decimal>,
    /// Preenchido para meses futuros
    pub forecast_quantity: Option<Decimal>,
    pub forecast_revenue: Option<Decimal>,
}

// POST /api/forecast
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub reference_date: Option<NaiveDate>,
    pub growth_rate: Decimal,
    pub months: Vec<ForecastMonth>,
    pub projected_quantity: Decimal,
    pub projected_revenue: Decimal,
}
