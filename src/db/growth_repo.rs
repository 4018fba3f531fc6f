// src/db/growth_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::{
        error::AppError,
        query_builder::{ReportQuery, SqlParam},
    },
    db::report_sql::{dimension_sql, push_segment_filters, SALES_SOURCE},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow},
        growth::GrowthQuantityRow,
    },
};

#[derive(Clone, Default)]
pub struct GrowthRepository;

impl GrowthRepository {
    pub fn new() -> Self {
        Self
    }

    /// Quantidade vendida por chave nas duas janelas. Só chaves com venda na janela atual.
    pub async fn quantities_by_key<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        dimension: GroupDimension,
        current: &ReportWindow,
        previous: &ReportWindow,
    ) -> Result<Vec<GrowthQuantityRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let built = growth_query(filters, dimension, current, previous).finish()?;
        let rows = built
            .query_as::<GrowthQuantityRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}

fn growth_query(
    filters: &FilterState,
    dimension: GroupDimension,
    current: &ReportWindow,
    previous: &ReportWindow,
) -> ReportQuery {
    let (key, _) = dimension_sql(dimension, SALES_SOURCE.date_column);
    let mut q = ReportQuery::default();

    let cur_start = q.bind(SqlParam::Date(current.start));
    let cur_end = q.bind(SqlParam::Date(current.end));
    let prev_start = q.bind(SqlParam::Date(previous.start));
    let prev_end = q.bind(SqlParam::Date(previous.end));

    let current_sum = format!(
        "COALESCE(SUM(s.quantity) FILTER (WHERE s.date BETWEEN {cur_start} AND {cur_end}), 0)::numeric"
    );
    let previous_sum = format!(
        "COALESCE(SUM(s.quantity) FILTER (WHERE s.date BETWEEN {prev_start} AND {prev_end}), 0)::numeric"
    );

    q.push(&format!(
        "SELECT ({key})::text AS group_key, {current_sum} AS current_quantity, {previous_sum} AS previous_quantity {from} \
         WHERE (s.date BETWEEN {prev_start} AND {prev_end} OR s.date BETWEEN {cur_start} AND {cur_end}) \
         AND {key} IS NOT NULL",
        from = SALES_SOURCE.from,
    ));
    push_segment_filters(&mut q, filters);
    q.push(&format!(" GROUP BY {key} HAVING {current_sum} > 0"));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::WindowKind;
    use chrono::NaiveDate;

    #[test]
    fn growth_query_reuses_window_parameters() {
        let current = ReportWindow {
            kind: WindowKind::Current,
            start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        };
        let previous = ReportWindow {
            kind: WindowKind::Comparison,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let built = growth_query(&FilterState::default(), GroupDimension::Brand, &current, &previous)
            .finish()
            .unwrap();

        // 4 datas + 11 filtros
        assert_eq!(built.params().len(), 15);
        assert!(built.sql().contains("GROUP BY gp.brand_lab HAVING"));
        assert!(built.sql().contains("gp.brand_lab IS NOT NULL"));
    }
}
