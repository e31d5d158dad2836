use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order},
    traits::PaymentGatewayError,
};

// SQLite extended error codes for a UNIQUE constraint violation on an index / primary key.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";

/// Inserts the order into the database, returning `false` in the second parameter if an order with
/// the same submission tuple already exists.
///
/// The lookup-then-insert sequence alone is racy under concurrent identical submissions, so a
/// unique-constraint violation on the insert is treated as "the other submission won" and resolved
/// by re-fetching the stored record.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<(Order, bool), PaymentGatewayError> {
    if let Some(existing) = fetch_order_matching(&order, conn).await? {
        return Ok((existing, false));
    }
    match insert_order(order.clone(), conn).await {
        Ok(inserted) => {
            debug!("📝️ Order #{} inserted for {}", inserted.id, inserted.buyer_email);
            Ok((inserted, true))
        },
        Err(sqlx::Error::Database(de))
            if matches!(de.code().as_deref(), Some(SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY)) =>
        {
            debug!("📝️ Lost an insert race on the submission key. Returning the stored order.");
            let existing = fetch_order_matching(&order, conn).await?.ok_or_else(|| {
                PaymentGatewayError::DatabaseError(
                    "An order vanished straight after winning the submission insert race".to_string(),
                )
            })?;
            Ok((existing, false))
        },
        Err(e) => Err(e.into()),
    }
}

/// Inserts a new order using the given connection. This is not atomic on its own. You can embed
/// this call inside a transaction if you need atomicity, and pass `&mut *tx` as the connection
/// argument.
async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                product_id,
                buyer_email,
                quantity,
                price
            ) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(order.product_id)
    .bind(order.buyer_email)
    .bind(order.quantity)
    .bind(order.price)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Returns the stored order with exactly the submission's identity tuple, if any.
pub async fn fetch_order_matching(
    order: &NewOrder,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let existing = sqlx::query_as(
        "SELECT * FROM orders WHERE product_id = $1 AND buyer_email = $2 AND quantity = $3 AND price = $4",
    )
    .bind(order.product_id)
    .bind(order.buyer_email.as_str())
    .bind(order.quantity)
    .bind(order.price)
    .fetch_optional(conn)
    .await?;
    Ok(existing)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Fetches all orders placed by the given buyer, oldest first.
pub async fn fetch_orders_for_buyer(email: &str, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE buyer_email = $1 ORDER BY created_at ASC")
        .bind(email)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Marks the order as paid by the given transaction. The only writer of `paid` and
/// `transaction_id`.
pub(crate) async fn mark_order_paid(
    id: i64,
    txid: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, PaymentGatewayError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET paid = 1, transaction_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(txid)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(PaymentGatewayError::OrderNotFound(id))
}
