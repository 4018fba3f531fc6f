// src/services/catalog_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{GlobalProduct, LabBrands, Pharmacy, SegmentationOptions},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    pub async fn pharmacies<'e, E>(&self, executor: E) -> Result<Vec<Pharmacy>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_pharmacies(executor).await
    }

    pub async fn labs<'e, E>(&self, executor: E) -> Result<Vec<LabBrands>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_labs(executor).await
    }

    pub async fn segmentation<'e, E>(&self, executor: E) -> Result<SegmentationOptions, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.segmentation_options(executor).await
    }

    pub async fn search_products<'e, E>(
        &self,
        executor: E,
        text: &str,
        limit: i64,
    ) -> Result<Vec<GlobalProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.search_products(executor, text, limit).await
    }

    // Aqui, "não encontrado" vira 404
    pub async fn product<'e, E>(&self, executor: E, code_13_ref: &str) -> Result<GlobalProduct, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_product(executor, code_13_ref)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(code_13_ref.to_string()))
    }
}
