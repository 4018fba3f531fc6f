// src/services/stock_service.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::StockRepository,
    models::{
        dimension::GroupDimension,
        filters::{FilterState, WindowKind},
        stock::{
            StockBreakAggregateRow, StockBreakEvolution, StockBreakMetrics, StockBreakProductRow,
            StockBreakProductsResponse, StockBreakSummaryResponse, StockDataResponse,
            StockMonthlyResponse,
        },
    },
};

#[derive(Clone)]
pub struct StockService {
    repo: StockRepository,
}

impl StockService {
    pub fn new(repo: StockRepository) -> Self {
        Self { repo }
    }

    /// Estoque no fim do `dateRange` (ou hoje, sem data).
    pub async fn current_stock<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        today: NaiveDate,
    ) -> Result<StockDataResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let at = filters.date_range.1.unwrap_or(today);
        let stock = self.repo.current_stock(executor, filters, at).await?;
        Ok(StockDataResponse { stock })
    }

    pub async fn monthly<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<StockMonthlyResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let months = self.repo.monthly_stock(executor, filters, &windows).await?;
        Ok(StockMonthlyResponse { months })
    }

    // --- RUPTURAS ---

    pub async fn break_summary<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<StockBreakSummaryResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let rows = self
            .repo
            .stock_breaks(executor, filters, &windows, None, None)
            .await?;
        Ok(build_break_summary(&rows, windows.len() > 1))
    }

    pub async fn break_products<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        limit: i64,
    ) -> Result<StockBreakProductsResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let window = filters.current_window()?;
        let rows = self
            .repo
            .stock_breaks(
                executor,
                filters,
                &[window],
                Some(GroupDimension::Product),
                Some(limit),
            )
            .await?;

        let products = rows
            .iter()
            .map(|row| StockBreakProductRow {
                code_13_ref: row.group_key.clone().unwrap_or_default(),
                name: row.group_label.clone().unwrap_or_default(),
                metrics: StockBreakMetrics::from(row),
            })
            .collect();
        Ok(StockBreakProductsResponse { products })
    }
}

fn empty_break_metrics(kind: WindowKind) -> StockBreakMetrics {
    StockBreakMetrics::from(&StockBreakAggregateRow {
        period: kind.as_str().to_string(),
        group_key: None,
        group_label: None,
        ordered_quantity: Default::default(),
        received_quantity: Default::default(),
        break_quantity: Default::default(),
        break_amount: Default::default(),
        order_count: 0,
        products_in_break: 0,
    })
}

pub fn build_break_summary(
    rows: &[StockBreakAggregateRow],
    with_comparison: bool,
) -> StockBreakSummaryResponse {
    let metrics_for = |kind: WindowKind| {
        rows.iter()
            .find(|row| row.period == kind.as_str())
            .map(StockBreakMetrics::from)
            .unwrap_or_else(|| empty_break_metrics(kind))
    };

    let current = metrics_for(WindowKind::Current);
    if !with_comparison {
        return StockBreakSummaryResponse {
            summary: vec![current],
            evolution: None,
        };
    }

    let comparison = metrics_for(WindowKind::Comparison);
    let evolution = StockBreakEvolution::between(&current, &comparison);
    StockBreakSummaryResponse {
        summary: vec![current, comparison],
        evolution: Some(evolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn break_row(period: &str, ordered: &str, received: &str, broken: &str) -> StockBreakAggregateRow {
        StockBreakAggregateRow {
            period: period.to_string(),
            group_key: None,
            group_label: None,
            ordered_quantity: d(ordered),
            received_quantity: d(received),
            break_quantity: d(broken),
            break_amount: d("12.345"),
            order_count: 1,
            products_in_break: 1,
        }
    }

    #[test]
    fn break_rate_is_rounded_percentage_of_ordered() {
        let response = build_break_summary(&[break_row("current", "3", "2", "1")], false);
        let current = &response.summary[0];

        assert_eq!(current.break_rate, d("33.33"));
        assert_eq!(current.break_amount, d("12.35"));
    }

    #[test]
    fn nothing_ordered_gives_zero_rate() {
        let response = build_break_summary(&[break_row("current", "0", "0", "0")], true);
        assert_eq!(response.summary[0].break_rate, Decimal::ZERO);
        assert_eq!(response.summary[1], empty_break_metrics(WindowKind::Comparison));
        assert_eq!(response.evolution.unwrap().break_quantity, Decimal::ZERO);
    }
}
