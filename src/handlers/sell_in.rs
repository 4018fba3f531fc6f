// src/handlers/sell_in.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::ApiError, extract::ValidatedQuery},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        filters::FilterQuery,
        sell_in::{SellInMonthlyResponse, SellInSummaryResponse},
    },
};

// GET /api/sell-in/summary
#[utoipa::path(
    get,
    path = "/api/sell-in/summary",
    tag = "Compras",
    params(FilterQuery),
    responses(
        (status = 200, description = "Quantidades pedidas/gratuitas/recebidas e valor de compra", body = SellInSummaryResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn sell_in_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = query
        .into_filters()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state
        .sell_in_service
        .summary(&app_state.db_pool, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/sell-in/monthly
#[utoipa::path(
    get,
    path = "/api/sell-in/monthly",
    tag = "Compras",
    params(FilterQuery),
    responses(
        (status = 200, description = "Compras mês a mês por janela", body = SellInMonthlyResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn sell_in_monthly(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = query
        .into_filters()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let monthly = app_state
        .sell_in_service
        .monthly(&app_state.db_pool, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(monthly)))
}
