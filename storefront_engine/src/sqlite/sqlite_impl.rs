//! `SqliteDatabase` is a concrete implementation of a storefront engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{new_pool, orders, payments, products, users};
use crate::{
    db_types::{NewOrder, NewPaymentRecord, NewProduct, Order, Product, Role, User},
    traits::{
        AuthApiError,
        CatalogApiError,
        CatalogManagement,
        PaymentGatewayDatabase,
        PaymentGatewayError,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool and returns a new instance of `SqliteDatabase`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any pending schema migrations to the database.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}

impl PaymentGatewayDatabase for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let (order, created) = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        if created {
            debug!("🗃️ Order #{} has been saved in the DB", order.id);
        }
        Ok((order, created))
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_buyer(&self, email: &str) -> Result<Vec<Order>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_buyer(email, &mut conn).await?;
        Ok(orders)
    }

    /// Records the payment and marks the order paid, in a single atomic transaction.
    ///
    /// The transition preconditions live here, next to the writes they guard:
    /// * an unknown order id fails with `OrderNotFound`;
    /// * an order already paid by the same transaction id is a no-op (`false` is returned);
    /// * an order already paid by a different transaction id fails with `PaymentConflict`.
    async fn settle_order(
        &self,
        order_id: i64,
        payment: NewPaymentRecord,
    ) -> Result<(Order, bool), PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order_by_id(order_id, &mut tx).await?.ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        if order.paid {
            let same_transaction = order.transaction_id.as_deref() == Some(payment.transaction_id.as_str());
            return if same_transaction {
                debug!("🗃️ Order #{order_id} is already settled by [{}]. Nothing to do.", payment.transaction_id);
                Ok((order, false))
            } else {
                warn!(
                    "🗃️ Refusing to apply [{}] to order #{order_id}, which is already paid by a different transaction",
                    payment.transaction_id
                );
                Err(PaymentGatewayError::PaymentConflict { order_id, txid: payment.transaction_id })
            };
        }
        let (record, _) = payments::idempotent_insert(payment, order_id, &mut tx).await?;
        let order = orders::mark_order_paid(order.id, &record.transaction_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{order_id} marked as paid by [{}]", record.transaction_id);
        Ok((order, true))
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_email(email, &mut conn).await
    }

    async fn upsert_user(&self, email: &str) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::upsert_user(email, &mut conn).await
    }

    async fn fetch_all_users(&self) -> Result<Vec<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_all_users(&mut conn).await
    }

    async fn fetch_role_for_email(&self, email: &str) -> Result<Option<Role>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_role_for_email(email, &mut conn).await
    }

    async fn set_role_for_email(&self, email: &str, role: Role) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::set_role_for_email(email, role, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products(&mut conn).await?;
        Ok(products)
    }

    async fn fetch_product_by_id(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product_by_id(id, &mut conn).await?;
        Ok(product)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await.map_err(CatalogApiError::from)
    }

    async fn delete_product(&self, id: i64) -> Result<(), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::delete_product(id, &mut conn).await
    }
}
