use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product},
    traits::CatalogApiError,
};

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id ASC").fetch_all(conn).await?;
    Ok(products)
}

pub async fn fetch_product_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let product: Product = sqlx::query_as("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING *")
        .bind(product.name)
        .bind(product.price)
        .fetch_one(conn)
        .await?;
    debug!("📝️ Product #{} ({}) added to the catalog", product.id, product.name);
    Ok(product)
}

/// Deletes the product with the given id. Deleting an id that does not exist is reported as
/// [`CatalogApiError::ProductNotFound`].
pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<(), CatalogApiError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    match result.rows_affected() {
        0 => Err(CatalogApiError::ProductNotFound(id)),
        _ => Ok(()),
    }
}
