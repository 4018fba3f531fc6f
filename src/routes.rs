// src/routes.rs

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::ApiError, config::AppState, docs::ApiDoc, handlers, middleware::i18n::Locale,
};

/// Sem origem configurada, qualquer origem é aceita.
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]);

    Ok(match allowed_origin {
        Some(origin) => layer.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("CORS_ALLOWED_ORIGIN inválido: {origin}"))?,
        ),
        None => layer.allow_origin(Any),
    })
}

async fn route_not_found(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        error: app_state.i18n_store.translate(&locale, "error.route_not_found", None),
        details: None,
    }
}

async fn method_not_allowed(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    ApiError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        error: app_state.i18n_store.translate(&locale, "error.method_not_allowed", None),
        details: None,
    }
}

pub fn build_router(app_state: AppState, cors: CorsLayer) -> Router {
    // --- Vendas ---
    let sales_routes = Router::new()
        .route("/api/sales", get(handlers::sales::sales_table))
        .route("/api/sales/summary", post(handlers::sales::sales_summary))
        .route("/api/sales/by-dimension/{dimension}", post(handlers::sales::sales_by_dimension))
        .route("/api/sales/segmentation-tree", post(handlers::sales::segmentation_tree))
        .route("/api/sales/yearly-trend", post(handlers::sales::sales_yearly_trend))
        .route("/api/forecast", post(handlers::forecast::forecast))
        .route("/api/sell-out/growth-labs", get(handlers::growth::growth_labs))
        .route("/api/sell-out/growth-categories", get(handlers::growth::growth_categories))
        .route("/api/sell-out/regression-labs", get(handlers::growth::regression_labs))
        .route("/api/sell-out/regression-categories", get(handlers::growth::regression_categories));

    // --- Compras, estoque e rupturas ---
    let supply_routes = Router::new()
        .route("/api/sell-in/summary", get(handlers::sell_in::sell_in_summary))
        .route("/api/sell-in/monthly", get(handlers::sell_in::sell_in_monthly))
        .route("/api/stock-data", get(handlers::stock::stock_data))
        .route("/api/stock/monthly", post(handlers::stock::stock_monthly))
        .route("/api/stock-breaks", post(handlers::stock::stock_breaks))
        .route("/api/stock-breaks/products", post(handlers::stock::stock_break_products))
        .route("/api/stock-breaks/yearly-trend", post(handlers::stock::stock_break_yearly_trend));

    // --- Catálogo (opções dos filtros) ---
    let catalog_routes = Router::new()
        .route("/api/filters/pharmacies", get(handlers::catalog::list_pharmacies))
        .route("/api/filters/labs", get(handlers::catalog::list_labs))
        .route("/api/filters/segmentation", get(handlers::catalog::segmentation_options))
        .route("/api/products/search", get(handlers::catalog::search_products))
        .route("/api/products/{ean13}", get(handlers::catalog::get_product));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(sales_routes)
        .merge(supply_routes)
        .merge(catalog_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
