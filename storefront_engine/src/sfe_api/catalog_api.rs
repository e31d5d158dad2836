use std::fmt::Debug;

use crate::{
    db_types::{NewProduct, Product},
    traits::{CatalogApiError, CatalogManagement},
};

/// `CatalogApi` wraps the plain product catalog operations.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products().await
    }

    pub async fn product_by_id(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        self.db.fetch_product_by_id(id).await
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        self.db.insert_product(product).await
    }

    pub async fn remove_product(&self, id: i64) -> Result<(), CatalogApiError> {
        self.db.delete_product(id).await
    }
}
