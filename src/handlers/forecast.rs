// src/handlers/forecast.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::ApiError, extract::ValidatedJson},
    config::AppState,
    handlers::today,
    middleware::i18n::Locale,
    models::{filters::ReportRequest, trend::ForecastResponse},
};

// POST /api/forecast
#[utoipa::path(
    post,
    path = "/api/forecast",
    tag = "Previsão",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Meses reais + previsão até dezembro (vazio sem filtro ativo)", body = ForecastResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn forecast(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let forecast = app_state
        .forecast_service
        .forecast(&app_state.db_pool, &payload.filters, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(forecast)))
}
