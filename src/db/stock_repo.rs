// src/db/stock_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};

use crate::{
    common::{
        error::AppError,
        query_builder::{ReportQuery, SqlParam},
    },
    db::report_sql::{push_segment_filters, windowed_aggregate, STOCK_BREAK_SOURCE},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow},
        stock::{MonthlyStockRow, StockBreakAggregateRow, StockProductRow},
    },
};

#[derive(Clone, Default)]
pub struct StockRepository;

impl StockRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Estoque: sempre o último inventário conhecido de cada produto da farmácia
    // ---

    pub async fn current_stock<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        at: NaiveDate,
    ) -> Result<Vec<StockProductRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let built = current_stock_query(filters, at).finish()?;
        let rows = built
            .query_as::<StockProductRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn monthly_stock<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        windows: &[ReportWindow],
    ) -> Result<Vec<MonthlyStockRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let built = monthly_stock_query(filters, windows).finish()?;
        let rows = built
            .query_as::<MonthlyStockRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // ---
    // Rupturas (pedido x recebido)
    // ---

    pub async fn stock_breaks<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        windows: &[ReportWindow],
        dimension: Option<GroupDimension>,
        limit: Option<i64>,
    ) -> Result<Vec<StockBreakAggregateRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut q = windowed_aggregate(&STOCK_BREAK_SOURCE, filters, windows, dimension);
        match limit {
            // Ranking: maiores rupturas primeiro
            Some(limit) => {
                q.push(" ORDER BY report.break_quantity DESC, report.group_key ASC LIMIT ");
                q.push_bind(SqlParam::Int(limit));
            }
            None => {
                q.push(" ORDER BY report.type DESC, report.group_key ASC");
            }
        }
        let built = q.finish()?;

        let rows = built
            .query_as::<StockBreakAggregateRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}

fn current_stock_query(filters: &FilterState, at: NaiveDate) -> ReportQuery {
    let mut q = ReportQuery::new(
        r#"
        WITH latest AS (
            SELECT DISTINCT ON (inv.product_id)
                inv.product_id, inv.stock, inv.weighted_average_price
            FROM data_inventorysnapshot inv
            WHERE inv.date <= "#,
    );
    q.push_bind(SqlParam::Date(at));
    q.push(
        r#"
            ORDER BY inv.product_id, inv.date DESC
        )
        SELECT
            gp.code_13_ref AS code_13_ref,
            gp.name AS name,
            gp.brand_lab AS brand_lab,
            COALESCE(SUM(l.stock), 0)::numeric AS stock_quantity,
            COALESCE(SUM(l.stock * l.weighted_average_price), 0)::numeric AS stock_value,
            COUNT(DISTINCT ip.pharmacy_id) AS pharmacy_count
        FROM latest l
        JOIN data_internalproduct ip ON ip.id = l.product_id
        JOIN data_globalproduct gp ON gp.code_13_ref = ip.code_13_ref_id
        WHERE TRUE"#,
    );
    push_segment_filters(&mut q, filters);
    q.push(" GROUP BY gp.code_13_ref, gp.name, gp.brand_lab ORDER BY stock_value DESC");
    q
}

fn monthly_stock_query(filters: &FilterState, windows: &[ReportWindow]) -> ReportQuery {
    let mut q = ReportQuery::new("SELECT * FROM (");
    for (index, window) in windows.iter().enumerate() {
        if index > 0 {
            q.push(" UNION ALL ");
        }
        let start = q.bind(SqlParam::Date(window.start));
        let end = q.bind(SqlParam::Date(window.end));
        q.push(&format!(
            r#"(
            SELECT '{kind}'::text AS type, m.month, COALESCE(SUM(m.stock), 0)::numeric AS stock_quantity,
                COALESCE(SUM(m.stock * m.weighted_average_price), 0)::numeric AS stock_value
            FROM (
                SELECT DISTINCT ON (inv.product_id, date_trunc('month', inv.date))
                    inv.product_id,
                    to_char(date_trunc('month', inv.date), 'YYYY-MM') AS month,
                    inv.stock,
                    inv.weighted_average_price
                FROM data_inventorysnapshot inv
                WHERE inv.date BETWEEN {start} AND {end}
                ORDER BY inv.product_id, date_trunc('month', inv.date), inv.date DESC
            ) m
            JOIN data_internalproduct ip ON ip.id = m.product_id
            JOIN data_globalproduct gp ON gp.code_13_ref = ip.code_13_ref_id
            WHERE TRUE"#,
            kind = window.kind.as_str(),
        ));
        push_segment_filters(&mut q, filters);
        q.push(" GROUP BY m.month)");
    }
    q.push(") AS report ORDER BY report.type DESC, report.month ASC");
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{DateRange, WindowKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn current_stock_binds_date_before_filters() {
        let filters = FilterState {
            brands: vec!["Avène".into()],
            ..Default::default()
        };
        let built = current_stock_query(&filters, date(2024, 6, 30)).finish().unwrap();

        assert_eq!(built.params()[0], SqlParam::Date(date(2024, 6, 30)));
        assert!(built.sql().contains("DISTINCT ON (inv.product_id)"));
        assert!(built.sql().contains("gp.brand_lab = ANY($3::text[])"));
    }

    #[test]
    fn monthly_stock_unions_both_windows() {
        let filters = FilterState {
            date_range: DateRange(Some(date(2024, 1, 1)), Some(date(2024, 12, 31))),
            comparison_date_range: DateRange(Some(date(2023, 1, 1)), Some(date(2023, 12, 31))),
            ..Default::default()
        };
        let windows = filters.windows().unwrap();
        assert_eq!(windows[1].kind, WindowKind::Comparison);

        let built = monthly_stock_query(&filters, &windows).finish().unwrap();
        assert_eq!(built.sql().matches("UNION ALL").count(), 1);
        assert_eq!(built.params().len(), 26);
    }

    #[test]
    fn monthly_stock_quantity_never_decodes_null() {
        let filters = FilterState {
            date_range: DateRange(Some(date(2024, 1, 1)), Some(date(2024, 3, 31))),
            ..Default::default()
        };
        let windows = filters.windows().unwrap();
        let built = monthly_stock_query(&filters, &windows).finish().unwrap();

        assert!(built.sql().contains("COALESCE(SUM(m.stock), 0)::numeric AS stock_quantity"));
        assert!(!built.sql().contains(" SUM(m.stock)::numeric"));
    }
}
