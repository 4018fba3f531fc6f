// src/services/forecast_service.rs

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use std::collections::HashMap;

use crate::{
    common::{
        error::AppError,
        metrics::{evolution_percent, round2},
    },
    db::SalesRepository,
    models::{
        filters::FilterState,
        trend::{ForecastMonth, ForecastResponse, MonthlySalesPoint},
    },
    services::trend_service::{monthly_sales, reference_date, split_by_year},
};

#[derive(Clone)]
pub struct ForecastService {
    repo: SalesRepository,
}

impl ForecastService {
    pub fn new(repo: SalesRepository) -> Self {
        Self { repo }
    }

    pub async fn forecast<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        today: NaiveDate,
    ) -> Result<ForecastResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !filters.has_active_filter() {
            return Ok(ForecastResponse::default());
        }
        let reference = reference_date(filters, today);
        let points = monthly_sales(&self.repo, executor, filters, reference).await?;
        Ok(build_forecast(points, reference))
    }
}

/// Meses já decorridos do ano da referência são reais; os seguintes repetem o
/// mesmo mês do ano anterior corrigido pela evolução acumulada no ano.
pub fn build_forecast(points: Vec<MonthlySalesPoint>, reference: NaiveDate) -> ForecastResponse {
    let split = split_by_year(points, reference);

    let ytd_revenue: Decimal = split.current_year.iter().map(|p| p.revenue).sum();
    let previous_ytd_revenue: Decimal = split.previous_year_to_date.iter().map(|p| p.revenue).sum();
    let growth_rate = evolution_percent(ytd_revenue, previous_ytd_revenue);
    let factor = Decimal::ONE + growth_rate / Decimal::ONE_HUNDRED;

    let by_month = |points: &[MonthlySalesPoint]| -> HashMap<u32, (Decimal, Decimal)> {
        points
            .iter()
            .filter_map(|p| {
                let month = p.month.get(5..7)?.parse::<u32>().ok()?;
                Some((month, (p.total_quantity, p.revenue)))
            })
            .collect()
    };
    let current = by_month(split.current_year.as_slice());
    let previous = by_month(split.previous_year.as_slice());

    let mut projected_quantity = Decimal::ZERO;
    let mut projected_revenue = Decimal::ZERO;
    let months = (1..=12u32)
        .map(|month| {
            let key = format!("{}-{month:02}", reference.year());
            if month <= reference.month() {
                let (quantity, revenue) = current.get(&month).copied().unwrap_or_default();
                projected_quantity += quantity;
                projected_revenue += revenue;
                ForecastMonth {
                    month: key,
                    actual_quantity: Some(quantity),
                    actual_revenue: Some(revenue),
                    forecast_quantity: None,
                    forecast_revenue: None,
                }
            } else {
                let (quantity, revenue) = previous.get(&month).copied().unwrap_or_default();
                let quantity = round2(quantity * factor);
                let revenue = round2(revenue * factor);
                projected_quantity += quantity;
                projected_revenue += revenue;
                ForecastMonth {
                    month: key,
                    actual_quantity: None,
                    actual_revenue: None,
                    forecast_quantity: Some(quantity),
                    forecast_revenue: Some(revenue),
                }
            }
        })
        .collect();

    ForecastResponse {
        reference_date: Some(reference),
        growth_rate,
        months,
        projected_quantity,
        projected_revenue: round2(projected_revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: &str, quantity: i64, revenue: i64) -> MonthlySalesPoint {
        MonthlySalesPoint {
            month: month.to_string(),
            total_quantity: Decimal::from(quantity),
            revenue: Decimal::from(revenue),
            margin: Decimal::ZERO,
        }
    }

    #[test]
    fn future_months_follow_last_year_scaled_by_growth() {
        let reference = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let points = vec![
            point("2023-01", 10, 100),
            point("2023-02", 10, 100),
            point("2023-03", 20, 400),
            point("2024-01", 11, 110),
            point("2024-02", 11, 110),
        ];
        let forecast = build_forecast(points, reference);

        assert_eq!(forecast.growth_rate, Decimal::from(10));
        assert_eq!(forecast.months.len(), 12);

        let feb = &forecast.months[1];
        assert_eq!(feb.actual_revenue, Some(Decimal::from(110)));
        assert!(feb.forecast_revenue.is_none());

        let march = &forecast.months[2];
        assert_eq!(march.month, "2024-03");
        assert_eq!(march.forecast_revenue, Some(Decimal::from(440)));
        assert_eq!(march.forecast_quantity, Some(Decimal::from(22)));

        // meses sem histórico prevêem zero
        assert_eq!(forecast.months[11].forecast_revenue, Some(Decimal::ZERO));
        assert_eq!(forecast.projected_revenue, Decimal::from(660));
        assert_eq!(forecast.projected_quantity, Decimal::from(44));
    }

    #[test]
    fn no_history_means_flat_zero_rate() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let forecast = build_forecast(vec![point("2024-01", 5, 50)], reference);
        assert_eq!(forecast.growth_rate, Decimal::ZERO);
        assert_eq!(forecast.projected_revenue, Decimal::from(50));
    }
}
