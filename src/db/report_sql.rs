// src/db/report_sql.rs

use crate::{
    common::query_builder::{ReportQuery, SqlParam},
    models::{
        dimension::GroupDimension,
        filters::{FilterState, ReportWindow},
    },
};

/// Uma "tabela de fatos" agregável: FROM + coluna de data + métricas.
/// Todos os FROM expõem os aliases `gp` (produto global), `ip` (produto da farmácia)
/// e `ph` (farmácia).
#[derive(Debug, Clone, Copy)]
pub struct FactSource {
    pub from: &'static str,
    pub date_column: &'static str,
    pub metrics: &'static str,
}

// ---
// Vendas (sell-out)
// ---
pub const SALES_SOURCE: FactSource = FactSource {
    from: r#"
        FROM data_sales s
        JOIN data_inventorysnapshot inv ON inv.id = s.product_id
        JOIN data_internalproduct ip ON ip.id = inv.product_id
        JOIN data_globalproduct gp ON gp.code_13_ref = ip.code_13_ref_id
        LEFT JOIN data_pharmacy ph ON ph.id = ip.pharmacy_id
    "#,
    date_column: "s.date",
    metrics: r#"
        COALESCE(SUM(s.quantity), 0)::numeric AS total_quantity,
        COALESCE(SUM(s.quantity * inv.price_with_tax), 0)::numeric AS revenue,
        -- IVA em %: produto global ou, na falta, a ficha da farmácia
        COALESCE(SUM(s.quantity * inv.price_with_tax
            / NULLIF(1 + COALESCE(gp.tva_percentage, ip."TVA", 0) / 100.0, 0)), 0)::numeric AS revenue_ht,
        COALESCE(SUM(s.quantity * inv.weighted_average_price), 0)::numeric AS purchase_cost,
        COUNT(DISTINCT gp.code_13_ref) AS product_count,
        COUNT(DISTINCT ip.pharmacy_id) AS pharmacy_count
    "#,
};

// Linhas de pedido + último preço médio conhecido na data de envio.
const ORDER_LINES_FROM: &str = r#"
        FROM data_productorder po
        JOIN data_order o ON o.id = po.order_id
        JOIN data_internalproduct ip ON ip.id = po.product_id
        JOIN data_globalproduct gp ON gp.code_13_ref = ip.code_13_ref_id
        LEFT JOIN data_pharmacy ph ON ph.id = ip.pharmacy_id
        LEFT JOIN LATERAL (
            SELECT snap.weighted_average_price
            FROM data_inventorysnapshot snap
            WHERE snap.product_id = ip.id AND snap.date <= o.sent_date
            ORDER BY snap.date DESC
            LIMIT 1
        ) last_price ON TRUE
    "#;

// ---
// Compras (sell-in)
// ---
pub const SELL_IN_SOURCE: FactSource = FactSource {
    from: ORDER_LINES_FROM,
    date_column: "o.sent_date",
    metrics: r#"
        COALESCE(SUM(po.qte), 0)::numeric AS ordered_quantity,
        COALESCE(SUM(po.qte_ug), 0)::numeric AS free_quantity,
        COALESCE(SUM(po.qte_r), 0)::numeric AS received_quantity,
        COALESCE(SUM(po.qte * last_price.weighted_average_price), 0)::numeric AS purchase_amount,
        COUNT(DISTINCT o.id) AS order_count,
        COUNT(DISTINCT gp.code_13_ref) AS product_count
    "#,
};

// ---
// Rupturas: pedido - recebido, nunca negativo.
// Linha sem qte_r (ainda não recebida) não conta como ruptura.
// ---
pub const STOCK_BREAK_SOURCE: FactSource = FactSource {
    from: ORDER_LINES_FROM,
    date_column: "o.sent_date",
    metrics: r#"
        COALESCE(SUM(po.qte), 0)::numeric AS ordered_quantity,
        COALESCE(SUM(po.qte_r), 0)::numeric AS received_quantity,
        COALESCE(SUM(GREATEST(po.qte - COALESCE(po.qte_r, po.qte), 0)), 0)::numeric AS break_quantity,
        COALESCE(SUM(GREATEST(po.qte - COALESCE(po.qte_r, po.qte), 0) * last_price.weighted_average_price), 0)::numeric AS break_amount,
        COUNT(DISTINCT o.id) AS order_count,
        COUNT(DISTINCT gp.code_13_ref) FILTER (WHERE po.qte > COALESCE(po.qte_r, po.qte)) AS products_in_break
    "#,
};

/// (expressão da chave, expressão do rótulo) para a dimensão.
pub fn dimension_sql(dimension: GroupDimension, date_column: &str) -> (String, String) {
    let same = |column: &str| (column.to_string(), column.to_string());
    match dimension {
        GroupDimension::Universe => same("gp.universe"),
        GroupDimension::Category => same("gp.category"),
        GroupDimension::SubCategory => same("gp.sub_category"),
        GroupDimension::Family => same("gp.family"),
        GroupDimension::SubFamily => same("gp.sub_family"),
        GroupDimension::Specificity => same("gp.specificity"),
        GroupDimension::Range => same("gp.range_name"),
        GroupDimension::Brand => same("gp.brand_lab"),
        GroupDimension::Distributor => same("gp.lab_distributor"),
        GroupDimension::Pharmacy => ("ip.pharmacy_id::text".to_string(), "ph.name".to_string()),
        GroupDimension::Product => ("gp.code_13_ref".to_string(), "gp.name".to_string()),
        GroupDimension::Month => same(&format!(
            "to_char(date_trunc('month', {date_column}), 'YYYY-MM')"
        )),
    }
}

/// Restrições de segmentação/farmácia/produto. Cada lista vira um parâmetro;
/// lista vazia = NULL = sem restrição.
pub fn push_segment_filters(q: &mut ReportQuery, filters: &FilterState) {
    q.push_text_filter("gp.lab_distributor", &filters.distributors)
        .push_text_filter("gp.brand_lab", &filters.brands)
        .push_text_filter("gp.universe", &filters.universes)
        .push_text_filter("gp.category", &filters.categories)
        .push_text_filter("gp.sub_category", &filters.sub_categories)
        .push_text_filter("gp.family", &filters.families)
        .push_text_filter("gp.sub_family", &filters.sub_families)
        .push_text_filter("gp.specificity", &filters.specificities)
        .push_text_filter("gp.range_name", &filters.ranges)
        .push_text_filter("gp.code_13_ref", &filters.ean13_products)
        .push_uuid_filter("ip.pharmacy_id", &filters.pharmacies);
}

/// `AND {coluna} BETWEEN $a AND $b`
pub fn push_window(q: &mut ReportQuery, date_column: &str, window: &ReportWindow) {
    let start = q.bind(SqlParam::Date(window.start));
    let end = q.bind(SqlParam::Date(window.end));
    q.push(&format!(" AND {date_column} BETWEEN {start} AND {end}"));
}

/// Uma subconsulta por janela, mesmas colunas, unidas por UNION ALL e marcadas
/// com `type` ('current' / 'comparison'). O chamador acrescenta ORDER BY/LIMIT
/// sobre o alias `report`.
pub fn windowed_aggregate(
    source: &FactSource,
    filters: &FilterState,
    windows: &[ReportWindow],
    dimension: Option<GroupDimension>,
) -> ReportQuery {
    let (key, label) = match dimension {
        Some(d) => dimension_sql(d, source.date_column),
        None => ("NULL::text".to_string(), "NULL::text".to_string()),
    };

    let mut q = ReportQuery::new("SELECT * FROM (");
    for (index, window) in windows.iter().enumerate() {
        if index > 0 {
            q.push(" UNION ALL ");
        }
        q.push(&format!(
            "(SELECT '{}'::text AS type, ({key})::text AS group_key, ({label})::text AS group_label, {} {} WHERE TRUE",
            window.kind.as_str(),
            source.metrics,
            source.from,
        ));
        push_window(&mut q, source.date_column, window);
        push_segment_filters(&mut q, filters);
        if dimension.is_some() {
            q.push(&format!(" GROUP BY {key}, {label}"));
        }
        q.push(")");
    }
    q.push(") AS report");
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{DateRange, WindowKind};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn lab_x_filters() -> FilterState {
        FilterState {
            distributors: vec!["LabX".into()],
            date_range: DateRange(Some(date("2024-01-01")), Some(date("2024-12-31"))),
            comparison_date_range: DateRange(Some(date("2023-01-01")), Some(date("2023-12-31"))),
            ..Default::default()
        }
    }

    #[test]
    fn two_windows_become_tagged_union() {
        let filters = lab_x_filters();
        let windows = filters.windows().unwrap();
        let built = windowed_aggregate(&SALES_SOURCE, &filters, &windows, None)
            .finish()
            .unwrap();

        let sql = built.sql();
        assert_eq!(sql.matches("UNION ALL").count(), 1);
        assert!(sql.contains("'current'::text AS type"));
        assert!(sql.contains("'comparison'::text AS type"));
        assert!(!sql.contains("GROUP BY"));
        // 2 datas + 11 filtros por janela
        assert_eq!(built.params().len(), 26);
    }

    #[test]
    fn only_non_empty_filters_carry_values() {
        let filters = lab_x_filters();
        let windows = filters.windows().unwrap();
        let built = windowed_aggregate(&SALES_SOURCE, &filters, &windows[..1], None)
            .finish()
            .unwrap();

        let params = built.params();
        assert_eq!(params[0], SqlParam::Date(date("2024-01-01")));
        assert_eq!(params[1], SqlParam::Date(date("2024-12-31")));
        assert_eq!(params[2], SqlParam::TextArray(Some(vec!["LabX".into()])));
        // marcas, universos, ... farmácias: sem restrição
        assert!(params[3..12].iter().all(|p| *p == SqlParam::TextArray(None)));
        assert_eq!(params[12], SqlParam::UuidArray(None));
        assert!(built.sql().contains("gp.lab_distributor = ANY($3::text[])"));
    }

    #[test]
    fn dimension_groups_each_window() {
        let filters = lab_x_filters();
        let windows = filters.windows().unwrap();
        let built = windowed_aggregate(
            &SALES_SOURCE,
            &filters,
            &windows,
            Some(GroupDimension::Month),
        )
        .finish()
        .unwrap();

        assert_eq!(
            built.sql().matches("GROUP BY to_char(date_trunc('month', s.date), 'YYYY-MM')").count(),
            2
        );
    }

    #[test]
    fn order_line_sources_use_sent_date() {
        let window = ReportWindow {
            kind: WindowKind::Current,
            start: date("2024-01-01"),
            end: date("2024-01-31"),
        };
        let built = windowed_aggregate(
            &STOCK_BREAK_SOURCE,
            &FilterState::default(),
            &[window],
            Some(GroupDimension::Pharmacy),
        )
        .finish()
        .unwrap();

        assert!(built.sql().contains("o.sent_date BETWEEN $1 AND $2"));
        assert!(built.sql().contains("GREATEST(po.qte - COALESCE(po.qte_r, po.qte), 0)"));
        assert!(built.sql().contains("GROUP BY ip.pharmacy_id::text, ph.name"));
    }

    #[test]
    fn pending_order_lines_are_not_breaks() {
        let metrics = STOCK_BREAK_SOURCE.metrics;
        assert_eq!(metrics.matches("COALESCE(po.qte_r, po.qte)").count(), 3);
        assert!(!metrics.contains("po.qte - po.qte_r"));
        assert!(!metrics.contains("po.qte > po.qte_r"));
    }
}
