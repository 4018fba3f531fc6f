// src/docs.rs

use utoipa::OpenApi;
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pharma Analytics API",
        description = "Relatórios de vendas, compras, estoque e rupturas das farmácias"
    ),
    paths(
        // --- Vendas ---
        handlers::sales::sales_summary,
        handlers::sales::sales_by_dimension,
        handlers::sales::sales_table,
        handlers::sales::segmentation_tree,
        handlers::sales::sales_yearly_trend,

        // --- Compras ---
        handlers::sell_in::sell_in_summary,
        handlers::sell_in::sell_in_monthly,

        // --- Estoque ---
        handlers::stock::stock_data,
        handlers::stock::stock_monthly,

        // --- Rupturas ---
        handlers::stock::stock_breaks,
        handlers::stock::stock_break_products,
        handlers::stock::stock_break_yearly_trend,

        // --- Crescimento ---
        handlers::growth::growth_labs,
        handlers::growth::growth_categories,
        handlers::growth::regression_labs,
        handlers::growth::regression_categories,

        // --- Previsão ---
        handlers::forecast::forecast,

        // --- Filtros / Produtos ---
        handlers::catalog::list_pharmacies,
        handlers::catalog::list_labs,
        handlers::catalog::segmentation_options,
        handlers::catalog::search_products,
        handlers::catalog::get_product,
    ),
    components(
        schemas(
            // --- Filtros ---
            models::filters::FilterState,
            models::filters::ReportRequest,
            models::dimension::GroupDimension,
            common::sorting::SortDirection,

            // --- Vendas ---
            models::sales::SalesMetrics,
            models::sales::SalesEvolution,
            models::sales::SalesSummaryResponse,
            models::sales::DimensionRow,
            models::sales::DimensionResponse,
            models::sales::SalesTableResponse,
            models::sales::SegmentNode,
            models::sales::SegmentTreeResponse,

            // --- Compras ---
            models::sell_in::SellInMetrics,
            models::sell_in::SellInEvolution,
            models::sell_in::SellInSummaryResponse,
            models::sell_in::SellInMonthlyResponse,

            // --- Estoque e rupturas ---
            models::stock::StockProductRow,
            models::stock::StockDataResponse,
            models::stock::MonthlyStockRow,
            models::stock::StockMonthlyResponse,
            models::stock::StockBreakMetrics,
            models::stock::StockBreakEvolution,
            models::stock::StockBreakSummaryResponse,
            models::stock::StockBreakProductsRequest,
            models::stock::StockBreakProductRow,
            models::stock::StockBreakProductsResponse,

            // --- Crescimento ---
            models::growth::GrowthEntry,
            models::growth::GrowthResponse,

            // --- Tendências e previsão ---
            models::trend::MonthlySalesPoint,
            models::trend::SalesBucket,
            models::trend::YearToDateEvolution,
            models::trend::SalesTrendResponse,
            models::trend::MonthlyStockBreakPoint,
            models::trend::StockBreakBucket,
            models::trend::StockBreakTrendResponse,
            models::trend::ForecastMonth,
            models::trend::ForecastResponse,

            // --- Catálogo ---
            models::catalog::Pharmacy,
            models::catalog::PharmaciesResponse,
            models::catalog::LabBrands,
            models::catalog::LabsResponse,
            models::catalog::SegmentationOptions,
            models::catalog::GlobalProduct,
            models::catalog::ProductsResponse,
            models::catalog::ProductResponse,
        )
    ),
    tags(
        (name = "Vendas", description = "Sell-out: resumo, dimensões, tabela, treemap e tendência anual"),
        (name = "Compras", description = "Sell-in: pedidos às distribuidoras"),
        (name = "Estoque", description = "Último inventário conhecido por produto"),
        (name = "Rupturas", description = "Pedido x recebido"),
        (name = "Crescimento", description = "Rankings de crescimento e queda (3 meses)"),
        (name = "Previsão", description = "Projeção do ano com base no ano anterior"),
        (name = "Filtros", description = "Opções dos dropdowns de filtro"),
        (name = "Produtos", description = "Busca e ficha de produto")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_report_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/sales/summary",
            "/api/sales/by-dimension/{dimension}",
            "/api/sell-in/monthly",
            "/api/stock-breaks/products",
            "/api/sell-out/regression-categories",
            "/api/products/{ean13}",
        ] {
            assert!(paths.contains_key(path), "rota sem documentação: {path}");
        }
    }
}
