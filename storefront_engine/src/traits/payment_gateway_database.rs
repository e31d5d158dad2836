use thiserror::Error;

use crate::db_types::{NewOrder, NewPaymentRecord, Order};

/// This trait defines the order-lifecycle behaviour that backends must support.
///
/// The behaviour includes:
/// * Idempotent order submission, keyed on the full submission tuple.
/// * The single order state transition, unpaid to paid, driven by payment settlement.
/// * Order queries for buyers and for individual records.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase {
    /// Takes an order submission and, in a single atomic transaction, stores it unless an order
    /// with the same submission tuple already exists.
    ///
    /// Returns the stored order, and `true` if this call created it. Resubmitting an identical
    /// order returns the existing record with `false` and performs no mutation. Two concurrent
    /// identical submissions must not both report `true`; the backend resolves the race with a
    /// uniqueness constraint on the submission tuple, not by trusting the lookup.
    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), PaymentGatewayError>;

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, PaymentGatewayError>;

    /// Fetches all orders placed by the given buyer, oldest first.
    async fn fetch_orders_for_buyer(&self, email: &str) -> Result<Vec<Order>, PaymentGatewayError>;

    /// Settles a confirmed payment against an order: records the payment, then marks the order
    /// paid with the payment's transaction id. Both writes happen in one transaction.
    ///
    /// Returns the order and `true` if this call performed the transition. The operation is safe
    /// to retry: settling an order that is already paid with the *same* transaction id is a no-op
    /// returning `false`, while a *different* transaction id against a paid order fails with
    /// [`PaymentGatewayError::PaymentConflict`]. A transaction id already recorded against some
    /// other order fails with [`PaymentGatewayError::PaymentAlreadyExists`].
    async fn settle_order(
        &self,
        order_id: i64,
        payment: NewPaymentRecord,
    ) -> Result<(Order, bool), PaymentGatewayError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order {order_id} is already paid by a different transaction; refusing to apply [{txid}]")]
    PaymentConflict { order_id: i64, txid: String },
    #[error("A payment with transaction id {0} is already recorded against another order")]
    PaymentAlreadyExists(String),
}

impl From<sqlx::Error> for PaymentGatewayError {
    fn from(e: sqlx::Error) -> Self {
        PaymentGatewayError::DatabaseError(e.to_string())
    }
}
