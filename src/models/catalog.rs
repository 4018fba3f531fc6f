// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Opções dos filtros (dropdowns) ---

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Pharmacy {
    pub id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PharmaciesResponse {
    pub pharmacies: Vec<Pharmacy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct LabBrands {
    pub lab_distributor: String,
    pub brands: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabsResponse {
    pub labs: Vec<LabBrands>,
}

// Valores distintos de cada nível da segmentação
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
pub struct SegmentationOptions {
    pub universes: Vec<String>,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub families: Vec<String>,
    pub sub_families: Vec<String>,
    pub specificities: Vec<String>,
    pub ranges: Vec<String>,
}

// --- Produtos ---

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GlobalProduct {
    pub code_13_ref: String,
    pub name: Option<String>,
    pub universe: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub family: Option<String>,
    pub sub_family: Option<String>,
    pub specificity: Option<String>,
    pub range_name: Option<String>,
    pub brand_lab: Option<String>,
    pub lab_distributor: Option<String>,
    pub tva_percentage: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub products: Vec<GlobalProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: GlobalProduct,
}

fn default_search_limit() -> i64 {
    20
}

// Conta sem os espaços das pontas, como a busca no banco
fn validate_search_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() < 2 {
        let mut err = ValidationError::new("search_length");
        err.message = Some("La recherche doit contenir au moins 2 caractères.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchQuery {
    #[validate(custom(function = "validate_search_text"))]
    pub q: String,

    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1, max = 100, message = "La limite doit être comprise entre 1 et 100."))]
    pub limit: i64,
}
