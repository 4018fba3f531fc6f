// src/handlers/growth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::ApiError, extract::ValidatedQuery},
    config::AppState,
    handlers::today,
    middleware::i18n::Locale,
    models::{dimension::GroupDimension, filters::FilterQuery, growth::GrowthResponse},
    services::growth_service::GrowthOrder,
};

// Os quatro rankings só mudam a chave e o sentido
async fn ranking(
    app_state: AppState,
    locale: Locale,
    query: FilterQuery,
    dimension: GroupDimension,
    order: GrowthOrder,
) -> Result<impl IntoResponse, ApiError> {
    let filters = query
        .into_filters()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .growth_service
        .ranking(&app_state.db_pool, &filters, dimension, order, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/sell-out/growth-labs
#[utoipa::path(
    get,
    path = "/api/sell-out/growth-labs",
    tag = "Crescimento",
    params(FilterQuery),
    responses(
        (status = 200, description = "Top 10 marcas em crescimento (3 meses x 3 meses anteriores)", body = GrowthResponse)
    )
)]
pub async fn growth_labs(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    ranking(app_state, locale, query, GroupDimension::Brand, GrowthOrder::Growth).await
}

// GET /api/sell-out/growth-categories
#[utoipa::path(
    get,
    path = "/api/sell-out/growth-categories",
    tag = "Crescimento",
    params(FilterQuery),
    responses(
        (status = 200, description = "Top 10 categorias em crescimento", body = GrowthResponse)
    )
)]
pub async fn growth_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    ranking(app_state, locale, query, GroupDimension::Category, GrowthOrder::Growth).await
}

// GET /api/sell-out/regression-labs
#[utoipa::path(
    get,
    path = "/api/sell-out/regression-labs",
    tag = "Crescimento",
    params(FilterQuery),
    responses(
        (status = 200, description = "Top 10 marcas em queda", body = GrowthResponse)
    )
)]
pub async fn regression_labs(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    ranking(app_state, locale, query, GroupDimension::Brand, GrowthOrder::Regression).await
}

// GET /api/sell-out/regression-categories
#[utoipa::path(
    get,
    path = "/api/sell-out/regression-categories",
    tag = "Crescimento",
    params(FilterQuery),
    responses(
        (status = 200, description = "Top 10 categorias em queda", body = GrowthResponse)
    )
)]
pub async fn regression_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    ranking(app_state, locale, query, GroupDimension::Category, GrowthOrder::Regression).await
}
