use crate::db_types::Order;

/// Fired when an order submission creates a new record. Duplicate submissions do not fire this
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderEvent {
    pub order: Order,
}

impl NewOrderEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Fired when payment reconciliation transitions an order to paid. Idempotent replays of a
/// settlement do not fire this event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
