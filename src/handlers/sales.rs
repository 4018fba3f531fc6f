// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::ApiError,
        extract::{ValidatedJson, ValidatedQuery},
    },
    config::AppState,
    handlers::today,
    middleware::i18n::Locale,
    models::{
        dimension::GroupDimension,
        filters::{FilterQuery, ReportRequest},
        sales::{
            DimensionResponse, SalesSummaryResponse, SalesTableResponse, SegmentTreeResponse,
            SortParams,
        },
        trend::SalesTrendResponse,
    },
};

// POST /api/sales/summary
#[utoipa::path(
    post,
    path = "/api/sales/summary",
    tag = "Vendas",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Totais da janela atual e da comparação", body = SalesSummaryResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn sales_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .sales_service
        .summary(&app_state.db_pool, &payload.filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/sales/by-dimension/{dimension}
#[utoipa::path(
    post,
    path = "/api/sales/by-dimension/{dimension}",
    tag = "Vendas",
    request_body = ReportRequest,
    params(
        ("dimension" = GroupDimension, Path, description = "Eixo de agrupamento (brand, category, month, ...)")
    ),
    responses(
        (status = 200, description = "Uma linha por chave, atual x comparação", body = DimensionResponse),
        (status = 400, description = "Dimensão desconhecida ou filtros inválidos")
    )
)]
pub async fn sales_by_dimension(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(dimension): Path<String>,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let dimension = dimension
        .parse::<GroupDimension>()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .sales_service
        .by_dimension(&app_state.db_pool, &payload.filters, dimension)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Vendas",
    params(FilterQuery, SortParams),
    responses(
        (status = 200, description = "Vendas por produto, ordenáveis", body = SalesTableResponse),
        (status = 400, description = "Filtros ou coluna de ordenação inválidos")
    )
)]
pub async fn sales_table(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<FilterQuery>,
    ValidatedQuery(sort): ValidatedQuery<SortParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filters = query
        .into_filters()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let table = app_state
        .sales_service
        .sales_table(&app_state.db_pool, &filters, &sort)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(table)))
}

// POST /api/sales/segmentation-tree
#[utoipa::path(
    post,
    path = "/api/sales/segmentation-tree",
    tag = "Vendas",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Treemap universo -> categoria", body = SegmentTreeResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn segmentation_tree(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tree = app_state
        .sales_service
        .segmentation_tree(&app_state.db_pool, &payload.filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tree)))
}

// POST /api/sales/yearly-trend
#[utoipa::path(
    post,
    path = "/api/sales/yearly-trend",
    tag = "Vendas",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Ano atual x ano anterior, mês a mês (vazio sem filtro ativo)", body = SalesTrendResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn sales_yearly_trend(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedJson(payload): ValidatedJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let trend = app_state
        .trend_service
        .sales_yearly_trend(&app_state.db_pool, &payload.filters, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(trend)))
}
