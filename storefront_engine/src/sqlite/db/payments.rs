use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPaymentRecord, PaymentRecord},
    traits::PaymentGatewayError,
};

/// Inserts the payment record for the given order, returning `false` in the second parameter if an
/// identical record already exists.
///
/// Payment records are write-once: a transaction id that is already recorded against a *different*
/// order is an error, while re-inserting the same (transaction, order) pair is a no-op.
pub async fn idempotent_insert(
    payment: NewPaymentRecord,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(PaymentRecord, bool), PaymentGatewayError> {
    if let Some(existing) = fetch_payment(&payment.transaction_id, conn).await? {
        if existing.order_id != order_id {
            return Err(PaymentGatewayError::PaymentAlreadyExists(payment.transaction_id));
        }
        debug!("📝️ Payment [{}] is already recorded against order #{order_id}", existing.transaction_id);
        return Ok((existing, false));
    }
    let record: PaymentRecord = sqlx::query_as(
        r#"
            INSERT INTO payments (transaction_id, amount, order_id)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(payment.transaction_id)
    .bind(payment.amount)
    .bind(order_id)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Payment [{}] of {} recorded against order #{order_id}", record.transaction_id, record.amount);
    Ok((record, true))
}

pub async fn fetch_payment(txid: &str, conn: &mut SqliteConnection) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let payment =
        sqlx::query_as("SELECT * FROM payments WHERE transaction_id = $1").bind(txid).fetch_optional(conn).await?;
    Ok(payment)
}
