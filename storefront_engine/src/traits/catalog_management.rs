use thiserror::Error;

use crate::db_types::{NewProduct, Product};

/// Plain catalog reads and writes. There are no invariants here beyond "store what was given";
/// the interesting parts of the system reference products, they don't manage them.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;

    async fn fetch_product_by_id(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    /// Deletes the product. Deleting an id that does not exist is reported as
    /// [`CatalogApiError::ProductNotFound`], not as a backend failure.
    async fn delete_product(&self, id: i64) -> Result<(), CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No product exists with id {0}")]
    ProductNotFound(i64),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
