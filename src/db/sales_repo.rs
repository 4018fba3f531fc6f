// src/db/sales_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::{error::AppError, query_builder::ReportQuery},
    db::report_sql::{push_segment_filters, push_window, windowed_aggregate, SALES_SOURCE},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow},
        sales::{SalesAggregateRow, SegmentRollupRow},
    },
};

#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Agregado de vendas por janela (e opcionalmente por dimensão)
    pub async fn aggregate<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        windows: &[ReportWindow],
        dimension: Option<GroupDimension>,
    ) -> Result<Vec<SalesAggregateRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut q = windowed_aggregate(&SALES_SOURCE, filters, windows, dimension);
        q.push(" ORDER BY report.type DESC, report.group_key ASC");
        let built = q.finish()?;

        let rows = built
            .query_as::<SalesAggregateRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // 2. Treemap: universo -> categoria, com subtotais via ROLLUP
    pub async fn segment_rollup<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        window: &ReportWindow,
    ) -> Result<Vec<SegmentRollupRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let built = segment_rollup_query(filters, window).finish()?;

        let rows = built
            .query_as::<SegmentRollupRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}

fn segment_rollup_query(filters: &FilterState, window: &ReportWindow) -> ReportQuery {
    let mut q = ReportQuery::new(&format!(
        r#"
        SELECT
            gp.universe AS universe,
            gp.category AS category,
            GROUPING(gp.universe, gp.category) AS grouping_level,
            COALESCE(SUM(s.quantity), 0)::numeric AS total_quantity,
            COALESCE(SUM(s.quantity * inv.price_with_tax), 0)::numeric AS revenue,
            COALESCE(SUM(s.quantity * inv.price_with_tax
                / NULLIF(1 + COALESCE(gp.tva_percentage, ip."TVA", 0) / 100.0, 0)), 0)::numeric AS revenue_ht,
            COALESCE(SUM(s.quantity * inv.weighted_average_price), 0)::numeric AS purchase_cost
        {}
        WHERE TRUE"#,
        SALES_SOURCE.from
    ));
    push_window(&mut q, SALES_SOURCE.date_column, window);
    push_segment_filters(&mut q, filters);
    q.push(
        " GROUP BY ROLLUP(gp.universe, gp.category) ORDER BY grouping_level DESC, revenue DESC",
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::WindowKind;
    use chrono::NaiveDate;

    #[test]
    fn rollup_query_is_well_formed() {
        let window = ReportWindow {
            kind: WindowKind::Current,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        };
        let built = segment_rollup_query(&FilterState::default(), &window)
            .finish()
            .unwrap();

        assert!(built.sql().contains("GROUP BY ROLLUP(gp.universe, gp.category)"));
        assert_eq!(built.params().len(), 13);
    }
}
