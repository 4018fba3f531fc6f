// src/services/growth_service.rs

use anyhow::anyhow;
use chrono::{Days, Months, NaiveDate};
use sqlx::{Executor, Postgres};
use std::cmp::Ordering;

use crate::{
    common::{error::AppError, metrics::evolution_percent},
    db::GrowthRepository,
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow, WindowKind},
        growth::{GrowthEntry, GrowthQuantityRow, GrowthResponse},
    },
};

pub const RANKING_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOrder {
    /// Maiores taxas primeiro
    Growth,
    /// Menores taxas primeiro
    Regression,
}

/// Duas janelas fixas de 3 meses: (hoje-3m, hoje] e (hoje-6m, hoje-3m].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthWindows {
    pub current: ReportWindow,
    pub previous: ReportWindow,
}

impl GrowthWindows {
    pub fn ending_at(today: NaiveDate) -> Result<Self, AppError> {
        let months_before = |n: u32| {
            today
                .checked_sub_months(Months::new(n))
                .ok_or_else(|| AppError::InternalServerError(anyhow!("data fora do intervalo: {today}")))
        };
        let day_after = |date: NaiveDate| {
            date.checked_add_days(Days::new(1))
                .ok_or_else(|| AppError::InternalServerError(anyhow!("data fora do intervalo: {date}")))
        };

        let three_months_ago = months_before(3)?;
        let six_months_ago = months_before(6)?;

        Ok(Self {
            current: ReportWindow {
                kind: WindowKind::Current,
                start: day_after(three_months_ago)?,
                end: today,
            },
            previous: ReportWindow {
                kind: WindowKind::Comparison,
                start: day_after(six_months_ago)?,
                end: three_months_ago,
            },
        })
    }
}

#[derive(Clone)]
pub struct GrowthService {
    repo: GrowthRepository,
}

impl GrowthService {
    pub fn new(repo: GrowthRepository) -> Self {
        Self { repo }
    }

    /// Ranking por marca (labs) ou categoria. As datas do filtro são ignoradas.
    pub async fn ranking<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        dimension: GroupDimension,
        order: GrowthOrder,
        today: NaiveDate,
    ) -> Result<GrowthResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = GrowthWindows::ending_at(today)?;
        let rows = self
            .repo
            .quantities_by_key(executor, filters, dimension, &windows.current, &windows.previous)
            .await?;

        Ok(GrowthResponse {
            current_period: [windows.current.start, windows.current.end],
            previous_period: [windows.previous.start, windows.previous.end],
            ranking: rank_growth(rows, order),
        })
    }
}

pub fn rank_growth(rows: Vec<GrowthQuantityRow>, order: GrowthOrder) -> Vec<GrowthEntry> {
    let mut entries: Vec<GrowthEntry> = rows
        .into_iter()
        .filter(|row| row.current_quantity > rust_decimal::Decimal::ZERO)
        .map(|row| GrowthEntry {
            growth_rate: evolution_percent(row.current_quantity, row.previous_quantity),
            name: row.group_key,
            current_quantity: row.current_quantity,
            previous_quantity: row.previous_quantity,
        })
        .collect();

    entries.sort_by(|a, b| {
        let by_rate = match order {
            GrowthOrder::Growth => b.growth_rate.cmp(&a.growth_rate),
            GrowthOrder::Regression => a.growth_rate.cmp(&b.growth_rate),
        };
        match by_rate {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        }
    });
    entries.truncate(RANKING_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(key: &str, current: i64, previous: i64) -> GrowthQuantityRow {
        GrowthQuantityRow {
            group_key: key.to_string(),
            current_quantity: Decimal::from(current),
            previous_quantity: Decimal::from(previous),
        }
    }

    #[test]
    fn windows_are_contiguous_three_month_blocks() {
        let windows = GrowthWindows::ending_at(date(2024, 6, 15)).unwrap();

        assert_eq!(windows.current.start, date(2024, 3, 16));
        assert_eq!(windows.current.end, date(2024, 6, 15));
        assert_eq!(windows.previous.start, date(2023, 12, 16));
        assert_eq!(windows.previous.end, date(2024, 3, 15));
    }

    #[test]
    fn month_end_is_clamped() {
        // 31/05 - 3 meses = 29/02 (ano bissexto)
        let windows = GrowthWindows::ending_at(date(2024, 5, 31)).unwrap();
        assert_eq!(windows.previous.end, date(2024, 2, 29));
        assert_eq!(windows.current.start, date(2024, 3, 1));
    }

    #[test]
    fn growth_sorts_descending_and_drops_keys_without_current_sales() {
        let rows = vec![row("A", 110, 100), row("B", 300, 100), row("C", 0, 50), row("D", 50, 100)];
        let ranking = rank_growth(rows, GrowthOrder::Growth);

        let names: Vec<_> = ranking.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "D"]);
        assert_eq!(ranking[0].growth_rate, Decimal::from(200));
        assert_eq!(ranking[2].growth_rate, Decimal::from(-50));
    }

    #[test]
    fn regression_sorts_ascending() {
        let rows = vec![row("A", 110, 100), row("B", 300, 100), row("D", 50, 100)];
        let ranking = rank_growth(rows, GrowthOrder::Regression);
        assert_eq!(ranking[0].name, "D");
    }

    #[test]
    fn new_keys_have_zero_rate_and_ranking_is_capped() {
        let rows: Vec<_> = (0..15).map(|i| row(&format!("K{i:02}"), 10 + i, 10)).collect();
        let mut with_new = rows.clone();
        with_new.push(row("NEW", 40, 0));

        let ranking = rank_growth(with_new, GrowthOrder::Growth);
        assert_eq!(ranking.len(), RANKING_SIZE);
        assert!(ranking.iter().all(|e| e.name != "NEW"));
        assert_eq!(ranking[0].name, "K14");
    }
}
