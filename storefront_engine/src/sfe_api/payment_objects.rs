use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// The outcome of reconciling a payment against an order.
///
/// `settled` is false when the order was already paid by the same transaction id - a replayed
/// confirmation, which is deliberately a success rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReconciliation {
    pub settled: bool,
    pub order: Order,
}
