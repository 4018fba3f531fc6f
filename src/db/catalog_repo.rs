// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::catalog::{GlobalProduct, LabBrands, Pharmacy, SegmentationOptions},
};

const PRODUCT_COLUMNS: &str = r#"
    gp.code_13_ref, gp.name, gp.universe, gp.category, gp.sub_category,
    gp.family, gp.sub_family, gp.specificity, gp.range_name,
    gp.brand_lab, gp.lab_distributor, gp.tva_percentage::numeric AS tva_percentage
"#;

// Leituras simples para montar os dropdowns de filtro e a ficha do produto.
#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_pharmacies<'e, E>(&self, executor: E) -> Result<Vec<Pharmacy>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pharmacies = sqlx::query_as::<_, Pharmacy>(
            "SELECT id, name FROM data_pharmacy ORDER BY name ASC NULLS LAST",
        )
        .fetch_all(executor)
        .await?;
        Ok(pharmacies)
    }

    /// Distribuidor -> marcas (dropdown em dois níveis).
    pub async fn list_labs<'e, E>(&self, executor: E) -> Result<Vec<LabBrands>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let labs = sqlx::query_as::<_, LabBrands>(
            r#"
            SELECT
                gp.lab_distributor AS lab_distributor,
                COALESCE(
                    ARRAY_AGG(DISTINCT gp.brand_lab ORDER BY gp.brand_lab)
                        FILTER (WHERE gp.brand_lab IS NOT NULL),
                    '{}'
                ) AS brands
            FROM data_globalproduct gp
            WHERE gp.lab_distributor IS NOT NULL
            GROUP BY gp.lab_distributor
            ORDER BY gp.lab_distributor ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(labs)
    }

    pub async fn segmentation_options<'e, E>(
        &self,
        executor: E,
    ) -> Result<SegmentationOptions, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let options = sqlx::query_as::<_, SegmentationOptions>(
            r#"
            SELECT
                ARRAY(SELECT DISTINCT universe FROM data_globalproduct WHERE universe IS NOT NULL ORDER BY 1) AS universes,
                ARRAY(SELECT DISTINCT category FROM data_globalproduct WHERE category IS NOT NULL ORDER BY 1) AS categories,
                ARRAY(SELECT DISTINCT sub_category FROM data_globalproduct WHERE sub_category IS NOT NULL ORDER BY 1) AS sub_categories,
                ARRAY(SELECT DISTINCT family FROM data_globalproduct WHERE family IS NOT NULL ORDER BY 1) AS families,
                ARRAY(SELECT DISTINCT sub_family FROM data_globalproduct WHERE sub_family IS NOT NULL ORDER BY 1) AS sub_families,
                ARRAY(SELECT DISTINCT specificity FROM data_globalproduct WHERE specificity IS NOT NULL ORDER BY 1) AS specificities,
                ARRAY(SELECT DISTINCT range_name FROM data_globalproduct WHERE range_name IS NOT NULL ORDER BY 1) AS ranges
            "#,
        )
        .fetch_one(executor)
        .await?;
        Ok(options)
    }

    /// Nome (contém, sem diferenciar maiúsculas) ou EAN13 (prefixo).
    pub async fn search_products<'e, E>(
        &self,
        executor: E,
        text: &str,
        limit: i64,
    ) -> Result<Vec<GlobalProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let escaped = escape_like(text.trim());
        let products = sqlx::query_as::<_, GlobalProduct>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM data_globalproduct gp
            WHERE gp.name ILIKE $1 OR gp.code_13_ref LIKE $2
            ORDER BY gp.name ASC NULLS LAST
            LIMIT $3
            "#
        ))
        .bind(format!("%{escaped}%"))
        .bind(format!("{escaped}%"))
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn find_product<'e, E>(
        &self,
        executor: E,
        code_13_ref: &str,
    ) -> Result<Option<GlobalProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, GlobalProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM data_globalproduct gp WHERE gp.code_13_ref = $1"
        ))
        .bind(code_13_ref)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }
}

// % e _ digitados pelo usuário não viram curingas.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_bio"), "100\\%\\_bio");
        assert_eq!(escape_like("crème"), "crème");
    }
}
