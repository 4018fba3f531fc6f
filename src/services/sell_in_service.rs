// src/services/sell_in_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::SellInRepository,
    models::{
        dimension::GroupDimension,
        filters::{FilterState, WindowKind},
        sell_in::{
            SellInAggregateRow, SellInEvolution, SellInMetrics, SellInMonthlyResponse,
            SellInSummaryResponse,
        },
    },
};

#[derive(Clone)]
pub struct SellInService {
    repo: SellInRepository,
}

impl SellInService {
    pub fn new(repo: SellInRepository) -> Self {
        Self { repo }
    }

    pub async fn summary<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<SellInSummaryResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let rows = self.repo.aggregate(executor, filters, &windows, None).await?;
        Ok(build_summary(rows, windows.len() > 1))
    }

    pub async fn monthly<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<SellInMonthlyResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let rows = self
            .repo
            .aggregate(executor, filters, &windows, Some(GroupDimension::Month))
            .await?;

        Ok(SellInMonthlyResponse {
            months: rows.into_iter().map(SellInMetrics::from).collect(),
        })
    }
}

fn empty_metrics(kind: WindowKind) -> SellInMetrics {
    SellInMetrics::from(SellInAggregateRow {
        period: kind.as_str().to_string(),
        group_key: None,
        group_label: None,
        ordered_quantity: Default::default(),
        free_quantity: Default::default(),
        received_quantity: Default::default(),
        purchase_amount: Default::default(),
        order_count: 0,
        product_count: 0,
    })
}

pub fn build_summary(rows: Vec<SellInAggregateRow>, with_comparison: bool) -> SellInSummaryResponse {
    let mut current = None;
    let mut comparison = None;
    for row in rows {
        if row.period == WindowKind::Current.as_str() {
            current = Some(SellInMetrics::from(row));
        } else if row.period == WindowKind::Comparison.as_str() {
            comparison = Some(SellInMetrics::from(row));
        }
    }

    let current = current.unwrap_or_else(|| empty_metrics(WindowKind::Current));
    if !with_comparison {
        return SellInSummaryResponse {
            summary: vec![current],
            evolution: None,
        };
    }

    let comparison = comparison.unwrap_or_else(|| empty_metrics(WindowKind::Comparison));
    let evolution = SellInEvolution::between(&current, &comparison);
    SellInSummaryResponse {
        summary: vec![current, comparison],
        evolution: Some(evolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row(period: &str, ordered: i64, amount: i64) -> SellInAggregateRow {
        SellInAggregateRow {
            period: period.to_string(),
            group_key: None,
            group_label: None,
            ordered_quantity: Decimal::from(ordered),
            free_quantity: Decimal::ZERO,
            received_quantity: Decimal::from(ordered),
            purchase_amount: Decimal::from(amount),
            order_count: 3,
            product_count: 2,
        }
    }

    #[test]
    fn evolution_compares_ordered_quantity_and_amount() {
        let response = build_summary(vec![row("current", 120, 600), row("comparison", 100, 800)], true);

        let evolution = response.evolution.unwrap();
        assert_eq!(evolution.ordered_quantity, Decimal::from(20));
        assert_eq!(evolution.purchase_amount, Decimal::from(-25));
    }

    #[test]
    fn missing_current_window_is_zero_not_error() {
        let response = build_summary(vec![], false);
        assert_eq!(response.summary[0].period, "current");
        assert_eq!(response.summary[0].order_count, 0);
        assert!(response.summary[0].month.is_none());
    }
}
