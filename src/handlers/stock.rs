// src/handlers/stock.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{
        error::ApiError,
        extract::{ValidatedJson, ValidatedQuery},
    },
    config::AppState,
    handlers::today,
    middleware::i18n::Locale,
    models::{
        filters::{FilterQuery, ReportRequest},
        stock::{
            StockBreakProductsRequest, StockBreakProductsResponse, StockBreakSummaryResponse,
            StockDataResponse, StockMonthlyResponse,
        },
        trend::StockBreakTrendResponse,
    },
};

// GET /api/stock-data
#[utoipa::path(
    get,
    path = "/api/stock-data",
    tag = "Estoque",
    params(FilterQuery),
    responses(
        (status = 200, description = "Último inventário por produto até endDate (ou hoje)", body = StockDataResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn stock_data(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = query
        .into_filters()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let stock = app_state
        .stock_service
        .current_stock(&app_state.db_pool, &filters, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stock)))
}

// POST /api/stock/monthly
#[utoipa::path(
    post,
    path = "/api/stock/monthly",
    tag = "Estoque",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Estoque no fim de cada mês, por janela", body = StockMonthlyResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn stock_monthly(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let months = app_state
        .stock_service
        .monthly(&app_state.db_pool, &payload.filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(months)))
}

// ---
// Rupturas
// ---

// POST /api/stock-breaks
#[utoipa::path(
    post,
    path = "/api/stock-breaks",
    tag = "Rupturas",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Pedido x recebido por janela", body = StockBreakSummaryResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn stock_breaks(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .stock_service
        .break_summary(&app_state.db_pool, &payload.filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/stock-breaks/products
#[utoipa::path(
    post,
    path = "/api/stock-breaks/products",
    tag = "Rupturas",
    request_body = StockBreakProductsRequest,
    responses(
        (status = 200, description = "Produtos com maior ruptura na janela atual", body = StockBreakProductsResponse),
        (status = 400, description = "Filtros ou limite inválidos")
    )
)]
pub async fn stock_break_products(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<StockBreakProductsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .stock_service
        .break_products(&app_state.db_pool, &payload.filters, payload.limit)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// POST /api/stock-breaks/yearly-trend
#[utoipa::path(
    post,
    path = "/api/stock-breaks/yearly-trend",
    tag = "Rupturas",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Rupturas mês a mês, ano atual x anterior", body = StockBreakTrendResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn stock_break_yearly_trend(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let trend = app_state
        .trend_service
        .stock_break_yearly_trend(&app_state.db_pool, &payload.filters, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trend)))
}
