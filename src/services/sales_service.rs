// src/services/sales_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use std::collections::HashMap;

use crate::{
    common::{
        error::AppError,
        metrics::round2,
        sorting::{is_sortable, sort_rows},
    },
    db::SalesRepository,
    models::{
        dimension::GroupDimension,
        filters::{FilterState, WindowKind},
        sales::{
            DimensionResponse, DimensionRow, SalesAggregateRow, SalesEvolution, SalesMetrics,
            SalesSummaryResponse, SalesTableResponse, SegmentNode, SegmentRollupRow,
            SegmentTreeResponse, SortParams,
        },
    },
};

pub const UNCLASSIFIED: &str = "Non classé";
const TREE_ROOT: &str = "Total";

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
}

impl SalesService {
    pub fn new(repo: SalesRepository) -> Self {
        Self { repo }
    }

    // --- RESUMO (atual x comparação) ---
    pub async fn summary<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<SalesSummaryResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let rows = self.repo.aggregate(executor, filters, &windows, None).await?;
        Ok(build_summary(&rows, windows.len() > 1))
    }

    // --- POR DIMENSÃO ---
    pub async fn by_dimension<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        dimension: GroupDimension,
    ) -> Result<DimensionResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = filters.windows()?;
        let rows = self
            .repo
            .aggregate(executor, filters, &windows, Some(dimension))
            .await?;

        Ok(DimensionResponse {
            dimension: dimension.as_str().to_string(),
            rows: merge_by_key(rows),
        })
    }

    // --- TABELA DE PRODUTOS (ordenável) ---
    pub async fn sales_table<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
        sort: &SortParams,
    ) -> Result<SalesTableResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Coluna inválida falha antes de ir ao banco
        if let Some(column) = &sort.sort_by {
            if !is_sortable::<DimensionRow>(column) {
                return Err(AppError::UnknownSortColumn(column.clone()));
            }
        }

        let windows = filters.windows()?;
        let rows = self
            .repo
            .aggregate(executor, filters, &windows, Some(GroupDimension::Product))
            .await?;

        let mut sales = merge_by_key(rows);
        if let Some(column) = &sort.sort_by {
            sort_rows(&mut sales, column, sort.sort_dir);
        }
        Ok(SalesTableResponse { sales })
    }

    // --- TREEMAP ---
    pub async fn segmentation_tree<'e, E>(
        &self,
        executor: E,
        filters: &FilterState,
    ) -> Result<SegmentTreeResponse, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let window = filters.current_window()?;
        let rows = self.repo.segment_rollup(executor, filters, &window).await?;
        Ok(SegmentTreeResponse {
            tree: build_segment_tree(&rows),
        })
    }
}

pub fn build_summary(rows: &[SalesAggregateRow], with_comparison: bool) -> SalesSummaryResponse {
    let metrics_for = |kind: WindowKind| {
        rows.iter()
            .find(|row| row.period == kind.as_str())
            .map(SalesMetrics::from_row)
            .unwrap_or_else(|| SalesMetrics::empty(kind.as_str()))
    };

    let current = metrics_for(WindowKind::Current);
    if !with_comparison {
        return SalesSummaryResponse {
            summary: vec![current],
            evolution: None,
        };
    }

    let comparison = metrics_for(WindowKind::Comparison);
    let evolution = SalesEvolution::between(&current, &comparison);
    SalesSummaryResponse {
        summary: vec![current, comparison],
        evolution: Some(evolution),
    }
}

/// Junta as linhas 'current' e 'comparison' da mesma chave numa linha plana.
/// Ordem: chaves da janela atual primeiro, depois as que só existem na comparação.
pub fn merge_by_key(rows: Vec<SalesAggregateRow>) -> Vec<DimensionRow> {
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();
    let mut current: Vec<Option<SalesMetrics>> = Vec::new();
    let mut comparison: Vec<Option<SalesMetrics>> = Vec::new();

    let (current_rows, comparison_rows): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| row.period == WindowKind::Current.as_str());

    for row in current_rows.iter().chain(comparison_rows.iter()) {
        let key = row.group_key.clone().unwrap_or_default();
        let index = match index_of.get(&key) {
            Some(&index) => index,
            None => {
                let label = row.group_label.clone().unwrap_or_default();
                index_of.insert(key.clone(), order.len());
                order.push((key, label));
                current.push(None);
                comparison.push(None);
                order.len() - 1
            }
        };
        let metrics = SalesMetrics::from_row(row);
        if row.period == WindowKind::Current.as_str() {
            current[index] = Some(metrics);
        } else {
            comparison[index] = Some(metrics);
        }
    }

    order
        .into_iter()
        .zip(current.into_iter().zip(comparison))
        .map(|((key, label), (cur, cmp))| {
            let cur = cur.unwrap_or_else(|| SalesMetrics::empty(WindowKind::Current.as_str()));
            let cmp = cmp.unwrap_or_else(|| SalesMetrics::empty(WindowKind::Comparison.as_str()));
            DimensionRow::new(key, label, &cur, &cmp)
        })
        .collect()
}

fn segment_node(name: Option<&str>, row: &SegmentRollupRow) -> SegmentNode {
    SegmentNode {
        name: name.unwrap_or(UNCLASSIFIED).to_string(),
        total_quantity: row.total_quantity,
        revenue: round2(row.revenue),
        margin: round2(row.revenue_ht - row.purchase_cost),
        children: Vec::new(),
    }
}

/// Monta Total -> universos -> categorias a partir das linhas do ROLLUP
/// (grouping_level 3 = total geral, 1 = subtotal do universo, 0 = folha).
pub fn build_segment_tree(rows: &[SegmentRollupRow]) -> SegmentNode {
    let mut root = rows
        .iter()
        .find(|row| row.grouping_level == 3)
        .map(|row| segment_node(Some(TREE_ROOT), row))
        .unwrap_or_else(|| SegmentNode {
            name: TREE_ROOT.to_string(),
            total_quantity: Decimal::ZERO,
            revenue: Decimal::ZERO,
            margin: Decimal::ZERO,
            children: Vec::new(),
        });

    // Universo NULL e universo "Non classé" são o mesmo nó
    let universe_name = |row: &SegmentRollupRow| {
        row.universe.clone().unwrap_or_else(|| UNCLASSIFIED.to_string())
    };

    for row in rows.iter().filter(|row| row.grouping_level == 1) {
        root.children.push(segment_node(row.universe.as_deref(), row));
    }

    for row in rows.iter().filter(|row| row.grouping_level == 0) {
        let universe = universe_name(row);
        let leaf = segment_node(row.category.as_deref(), row);
        match root.children.iter_mut().find(|node| node.name == universe) {
            Some(parent) => parent.children.push(leaf),
            None => {
                tracing::warn!(%universe, "categoria sem subtotal de universo no ROLLUP");
                let mut parent = segment_node(Some(&universe), row);
                parent.children.push(leaf);
                root.children.push(parent);
            }
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sales_row(period: &str, key: Option<&str>, quantity: &str, revenue: &str) -> SalesAggregateRow {
        SalesAggregateRow {
            period: period.to_string(),
            group_key: key.map(str::to_string),
            group_label: key.map(|k| format!("Label {k}")),
            total_quantity: d(quantity),
            revenue: d(revenue),
            revenue_ht: d(revenue),
            purchase_cost: d("0"),
            product_count: 1,
            pharmacy_count: 1,
        }
    }

    #[test]
    fn summary_with_comparison_has_two_rows_and_evolution() {
        let rows = vec![
            sales_row("current", None, "150", "3000"),
            sales_row("comparison", None, "100", "2000"),
        ];
        let response = build_summary(&rows, true);

        assert_eq!(response.summary.len(), 2);
        assert_eq!(response.summary[0].period, "current");
        assert_eq!(response.summary[1].period, "comparison");
        let evolution = response.evolution.unwrap();
        assert_eq!(evolution.quantity, d("50"));
        assert_eq!(evolution.revenue, d("50"));
    }

    #[test]
    fn summary_fills_missing_window_with_zeros() {
        let rows = vec![sales_row("current", None, "10", "100")];
        let response = build_summary(&rows, true);

        assert_eq!(response.summary[1], SalesMetrics::empty("comparison"));
        // anterior = 0 => evolução 0
        assert_eq!(response.evolution.unwrap().quantity, Decimal::ZERO);
    }

    #[test]
    fn summary_without_comparison_omits_evolution() {
        let response = build_summary(&[], false);
        assert_eq!(response.summary.len(), 1);
        assert!(response.evolution.is_none());
    }

    #[test]
    fn merge_keeps_keys_only_present_in_comparison() {
        let rows = vec![
            sales_row("current", Some("A"), "20", "200"),
            sales_row("comparison", Some("A"), "10", "100"),
            sales_row("comparison", Some("B"), "5", "50"),
        ];
        let merged = merge_by_key(rows);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].key, "A");
        assert_eq!(merged[0].quantity_evolution, d("100"));
        assert_eq!(merged[1].key, "B");
        assert_eq!(merged[1].total_quantity, Decimal::ZERO);
        assert_eq!(merged[1].comparison_quantity, d("5"));
        assert_eq!(merged[1].quantity_evolution, d("-100"));
    }

    fn rollup(universe: Option<&str>, category: Option<&str>, level: i32, revenue: &str) -> SegmentRollupRow {
        SegmentRollupRow {
            universe: universe.map(str::to_string),
            category: category.map(str::to_string),
            grouping_level: level,
            total_quantity: d("1"),
            revenue: d(revenue),
            revenue_ht: d(revenue),
            purchase_cost: d("0"),
        }
    }

    #[test]
    fn segment_tree_nests_categories_under_universes() {
        let rows = vec![
            rollup(None, None, 3, "300"),
            rollup(Some("Soins"), None, 1, "200"),
            rollup(None, None, 1, "100"),
            rollup(Some("Soins"), Some("Visage"), 0, "150"),
            rollup(Some("Soins"), None, 0, "50"),
            rollup(None, Some("Divers"), 0, "100"),
        ];
        let tree = build_segment_tree(&rows);

        assert_eq!(tree.name, "Total");
        assert_eq!(tree.revenue, d("300"));
        assert_eq!(tree.children.len(), 2);

        let soins = &tree.children[0];
        assert_eq!(soins.name, "Soins");
        assert_eq!(soins.children.len(), 2);
        assert_eq!(soins.children[1].name, UNCLASSIFIED);

        let unclassified = &tree.children[1];
        assert_eq!(unclassified.name, UNCLASSIFIED);
        assert_eq!(unclassified.children[0].name, "Divers");
    }

    #[test]
    fn empty_rollup_gives_zero_root() {
        let tree = build_segment_tree(&[]);
        assert_eq!(tree.revenue, Decimal::ZERO);
        assert!(tree.children.is_empty());
    }
}
