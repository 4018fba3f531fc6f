// src/services/trend_service.rs

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::{
        error::AppError,
        metrics::{average, evolution_percent, round2, stock_break_rate},
    },
    db::{SalesRepository, StockRepository},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow, WindowKind},
        trend::{
            MonthKeyed, MonthlySalesPoint, MonthlyStockBreakPoint, SalesBucket,
            SalesTrendResponse, StockBreakBucket, StockBreakTrendResponse, YearToDateEvolution,
        },
    },
};

// =============================================================================
//  SEPARAÇÃO POR ANO
// =============================================================================

/// Linhas mensais separadas em: ano da referência, ano anterior (inteiro) e
/// ano anterior até o mês da referência.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSplit<T> {
    pub current_year: Vec<T>,
    pub previous_year: Vec<T>,
    pub previous_year_to_date: Vec<T>,
}

fn parse_month(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub fn split_by_year<T: MonthKeyed + Clone>(rows: Vec<T>, reference: NaiveDate) -> YearSplit<T> {
    let mut split = YearSplit {
        current_year: Vec::new(),
        previous_year: Vec::new(),
        previous_year_to_date: Vec::new(),
    };

    for row in rows {
        let Some((year, month)) = parse_month(row.month()) else {
            tracing::warn!(month = row.month(), "mês mal formado ignorado");
            continue;
        };

        if year == reference.year() {
            split.current_year.push(row);
        } else if year == reference.year() - 1 {
            if month <= reference.month() {
                split.previous_year_to_date.push(row.clone());
            }
            split.previous_year.push(row);
        } else {
            tracing::warn!(month = row.month(), "mês fora da janela de dois anos ignorado");
        }
    }
    split
}

/// Jan/01 do ano anterior até a referência.
pub fn two_year_window(reference: NaiveDate) -> Result<ReportWindow, AppError> {
    let start = NaiveDate::from_ymd_opt(reference.year() - 1, 1, 1)
        .ok_or_else(|| AppError::InternalServerError(anyhow!("ano inválido: {reference}")))?;
    Ok(ReportWindow {
        kind: WindowKind::Current,
        start,
        end: reference,
    })
}

/// Fim do `dateRange` ou hoje.
pub fn reference_date(filters: &FilterState, today: NaiveDate) -> NaiveDate {
    filters.date_range.1.unwrap_or(today)
}

// =============================================================================
//  BALDES
// =============================================================================

pub fn sales_bucket(months: Vec<MonthlySalesPoint>) -> SalesBucket {
    let count = Decimal::from(months.len());
    let total_quantity: Decimal = months.iter().map(|m| m.total_quantity).sum();
    let total_revenue: Decimal = months.iter().map(|m| m.revenue).sum();
    let total_margin: Decimal = months.iter().map(|m| m.margin).sum();

    SalesBucket {
        average_quantity: average(total_quantity, count),
        average_revenue: average(total_revenue, count),
        average_margin: average(total_margin, count),
        total_quantity,
        total_revenue: round2(total_revenue),
        total_margin: round2(total_margin),
        months,
    }
}

pub fn stock_break_bucket(months: Vec<MonthlyStockBreakPoint>) -> StockBreakBucket {
    let count = Decimal::from(months.len());
    let ordered_quantity: Decimal = months.iter().map(|m| m.ordered_quantity).sum();
    let break_quantity: Decimal = months.iter().map(|m| m.break_quantity).sum();

    StockBreakBucket {
        break_rate: stock_break_rate(break_quantity, ordered_quantity),
        average_break_quantity: average(break_quantity, count),
        ordered_quantity,
        break_quantity,
        months,
    }
}

pub fn sales_trend(points: Vec<MonthlySalesPoint>, reference: NaiveDate) -> SalesTrendResponse {
    let split = split_by_year(points, reference);
    let current_year = sales_bucket(split.current_year);
    let previous_year = sales_bucket(split.previous_year);
    let previous_year_to_date = sales_bucket(split.previous_year_to_date);

    let evolution = YearToDateEvolution {
        quantity: evolution_percent(current_year.total_quantity, previous_year_to_date.total_quantity),
        revenue: evolution_percent(current_year.total_revenue, previous_year_to_date.total_revenue),
        margin: evolution_percent(current_year.total_margin, previous_year_to_date.total_margin),
    };

    SalesTrendResponse {
        reference_date: Some(reference),
        current_year,
        previous_year,
        previous_year_to_date,
        evolution,
    }
}

pub fn stock_break_trend(
    points: Vec<MonthlyStockBreakPoint>,
    reference: NaiveDate,
) -> StockBreakTrendResponse {
    let split = split_by_year(points, reference);
    let current_year = stock_break_bucket(split.current_year);
    let previous_year = stock_break_bucket(split.previous_year);
    let previous_year_to_date = stock_break_bucket(split.previous_year_to_date);

    StockBreakTrendResponse {
        reference_date: Some(reference),
        break_quantity_evolution: evolution_percent(
            current_year.break_quantity,
            previous_year_to_date.break_quantity,
        ),
        current_year,
        previous_year,
        previous_year_to_date,
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

/// Vendas mês a mês, de Jan/01 do ano anterior até a referência.
pub(crate) async fn monthly_sales<'e, E>(
    repo: &SalesRepository,
    executor: E,
    filters: &FilterState,
    reference: NaiveDate,
) -> Result<Vec<MonthlySalesPoint>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let window = two_year_window(reference)?;
    let rows = repo
        .aggregate(executor, filters, &[window], Some(GroupDimension::Month))
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| MonthlySalesPoint {
            month: row.group_key.unwrap_or_default(),
            total_quantity: row.total_quantity,
            revenue: round2(row.revenue),
            margin: round2(row.revenue_ht - row.purchase_cost),
        })
        .collect())
}

#[derive(Clone)]
pub struct TrendService {
    sales_repo: SalesRepository,
    stock_repo: StockRepository,
}

impl TrendService {
    pub fn new(sales_repo: SalesRepository, stock_repo: StockRepository) -> Self {
        Self {
            sales_repo,
            stock_repo,
        }
    }

    pub async fn sales_yearly_trend<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        today: NaiveDate,
    ) -> Result<SalesTrendResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Sem filtro ativo: nada a consultar
        if !filters.has_active_filter() {
            return Ok(SalesTrendResponse::default());
        }
        let reference = reference_date(filters, today);
        let points = monthly_sales(&self.sales_repo, executor, filters, reference).await?;
        Ok(sales_trend(points, reference))
    }

    pub async fn stock_break_yearly_trend<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        today: NaiveDate,
    ) -> Result<StockBreakTrendResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !filters.has_active_filter() {
            return Ok(StockBreakTrendResponse::default());
        }
        let reference = reference_date(filters, today);
        let window = two_year_window(reference)?;
        let rows = self
            .stock_repo
            .stock_breaks(executor, filters, &[window], Some(GroupDimension::Month), None)
            .await?;

        let points = rows
            .into_iter()
            .map(|row| MonthlyStockBreakPoint {
                break_rate: stock_break_rate(row.break_quantity, row.ordered_quantity),
                month: row.group_key.unwrap_or_default(),
                ordered_quantity: row.ordered_quantity,
                break_quantity: row.break_quantity,
            })
            .collect();
        Ok(stock_break_trend(points, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn point(month: &str, quantity: i64, revenue: i64) -> MonthlySalesPoint {
        MonthlySalesPoint {
            month: month.to_string(),
            total_quantity: Decimal::from(quantity),
            revenue: Decimal::from(revenue),
            margin: Decimal::from(revenue / 4),
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn rows_partition_into_years_without_double_counting() {
        let rows = vec![
            point("2023-01", 10, 100),
            point("2023-03", 10, 100),
            point("2023-04", 10, 100),
            point("2023-12", 10, 100),
            point("2024-01", 20, 200),
            point("2024-03", 20, 200),
        ];
        let split = split_by_year(rows, reference());

        assert_eq!(split.current_year.len(), 2);
        assert_eq!(split.previous_year.len(), 4);
        let ytd: Vec<_> = split.previous_year_to_date.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(ytd, vec!["2023-01", "2023-03"]);
    }

    #[test]
    fn malformed_and_out_of_range_months_are_dropped() {
        let rows = vec![point("2024-13", 1, 1), point("garbage", 1, 1), point("2022-05", 1, 1)];
        let split = split_by_year(rows, reference());

        assert!(split.current_year.is_empty());
        assert!(split.previous_year.is_empty());
    }

    #[test]
    fn bucket_averages_over_months_present() {
        let bucket = sales_bucket(vec![point("2024-01", 10, 100), point("2024-02", 5, 50)]);

        assert_eq!(bucket.total_quantity, d("15"));
        assert_eq!(bucket.average_quantity, d("7.5"));
        assert_eq!(bucket.average_revenue, d("75"));
        assert_eq!(sales_bucket(vec![]).average_revenue, Decimal::ZERO);
    }

    #[test]
    fn sales_trend_compares_with_same_months_last_year() {
        let rows = vec![
            point("2023-01", 10, 100),
            point("2023-02", 10, 100),
            point("2023-06", 100, 1000),
            point("2024-01", 15, 150),
            point("2024-02", 15, 150),
        ];
        let trend = sales_trend(rows, reference());

        assert_eq!(trend.previous_year.total_revenue, d("1200"));
        assert_eq!(trend.previous_year_to_date.total_revenue, d("200"));
        assert_eq!(trend.evolution.revenue, d("50"));
        assert_eq!(trend.evolution.quantity, d("50"));
    }

    #[test]
    fn stock_break_trend_recomputes_bucket_rate_from_totals() {
        let rows = vec![
            MonthlyStockBreakPoint {
                month: "2024-01".into(),
                ordered_quantity: d("10"),
                break_quantity: d("1"),
                break_rate: d("10"),
            },
            MonthlyStockBreakPoint {
                month: "2024-02".into(),
                ordered_quantity: d("30"),
                break_quantity: d("9"),
                break_rate: d("30"),
            },
        ];
        let trend = stock_break_trend(rows, reference());

        assert_eq!(trend.current_year.break_rate, d("25"));
        assert_eq!(trend.current_year.average_break_quantity, d("5"));
        assert_eq!(trend.break_quantity_evolution, Decimal::ZERO);
    }

    #[test]
    fn reference_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(reference_date(&FilterState::default(), today), today);
        let window = two_year_window(today).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
