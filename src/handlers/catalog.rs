// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, extract::ValidatedQuery},
    config::AppState,
    middleware::i18n::Locale,
    models::catalog::{
        LabsResponse, PharmaciesResponse, ProductResponse, ProductSearchQuery, ProductsResponse,
        SegmentationOptions,
    },
};

// GET /api/filters/pharmacies
#[utoipa::path(
    get,
    path = "/api/filters/pharmacies",
    tag = "Filtros",
    responses(
        (status = 200, description = "Farmácias disponíveis no filtro", body = PharmaciesResponse)
    )
)]
pub async fn list_pharmacies(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let pharmacies = app_state
        .catalog_service
        .pharmacies(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(PharmaciesResponse { pharmacies })))
}

// GET /api/filters/labs
#[utoipa::path(
    get,
    path = "/api/filters/labs",
    tag = "Filtros",
    responses(
        (status = 200, description = "Distribuidores e suas marcas", body = LabsResponse)
    )
)]
pub async fn list_labs(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let labs = app_state
        .catalog_service
        .labs(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(LabsResponse { labs })))
}

// GET /api/filters/segmentation
#[utoipa::path(
    get,
    path = "/api/filters/segmentation",
    tag = "Filtros",
    responses(
        (status = 200, description = "Valores distintos de cada nível da segmentação", body = SegmentationOptions)
    )
)]
pub async fn segmentation_options(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let options = app_state
        .catalog_service
        .segmentation(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(options)))
}

// GET /api/products/search
#[utoipa::path(
    get,
    path = "/api/products/search",
    tag = "Produtos",
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "Produtos por nome ou prefixo EAN13", body = ProductsResponse),
        (status = 400, description = "Busca muito curta ou limite inválido")
    )
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    locale: Locale,
    ValidatedQuery(query): ValidatedQuery<ProductSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .search_products(&app_state.db_pool, &query.q, query.limit)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ProductsResponse { products })))
}

// GET /api/products/{ean13}
#[utoipa::path(
    get,
    path = "/api/products/{ean13}",
    tag = "Produtos",
    params(
        ("ean13" = String, Path, description = "Código EAN13 do produto")
    ),
    responses(
        (status = 200, description = "Ficha do produto", body = ProductResponse),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(ean13): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .product(&app_state.db_pool, &ean13)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ProductResponse { product })))
}
