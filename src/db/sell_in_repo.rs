// src/db/sell_in_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::report_sql::{windowed_aggregate, SELL_IN_SOURCE},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow},
        sell_in::SellInAggregateRow,
    },
};

#[derive(Clone, Default)]
pub struct SellInRepository;

impl SellInRepository {
    pub fn new() -> Self {
        Self
    }

    /// Compras (linhas de pedido) por janela, opcionalmente por dimensão.
    pub async fn aggregate<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        windows: &[ReportWindow],
        dimension: Option<GroupDimension>,
    ) -> Result<Vec<SellInAggregateRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut q = windowed_aggregate(&SELL_IN_SOURCE, filters, windows, dimension);
        q.push(" ORDER BY report.type DESC, report.group_key ASC");
        let built = q.finish()?;

        let rows = built
            .query_as::<SellInAggregateRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}
