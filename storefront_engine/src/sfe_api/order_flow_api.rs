use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, NewPaymentRecord, Order},
    events::{EventProducers, NewOrderEvent, OrderPaidEvent},
    sfe_api::{order_objects::OrderSubmission, payment_objects::PaymentReconciliation},
    traits::{PaymentGatewayDatabase, PaymentGatewayError},
};

/// `OrderFlowApi` is the primary API for handling order and payment flows: accepting order
/// submissions from the storefront and reconciling confirmed payments against them.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: PaymentGatewayDatabase
{
    /// Submit an order to the order manager.
    ///
    /// Submission is idempotent on the full submission tuple: a resubmission of an identical order
    /// returns the original record with `created == false` and fires no events. Only a genuinely
    /// new order fires the new-order hook.
    pub async fn submit_order(&self, order: NewOrder) -> Result<OrderSubmission, PaymentGatewayError> {
        let (order, created) = self.db.insert_order(order).await?;
        if created {
            debug!("🔄️📦️ Order #{} accepted for {}, totalling {}", order.id, order.buyer_email, order.price);
            self.call_new_order_hook(&order).await;
        } else {
            debug!("🔄️📦️ Duplicate submission matched existing order #{}. No action taken.", order.id);
        }
        Ok(OrderSubmission { created, order })
    }

    /// Reconcile a confirmed payment against the given order, transitioning it from unpaid to
    /// paid.
    ///
    /// Replaying a settlement (same order, same transaction id) returns `settled == false` and
    /// fires no events. Retrying a partially-applied reconciliation converges on the same state.
    pub async fn reconcile_payment(
        &self,
        order_id: i64,
        payment: NewPaymentRecord,
    ) -> Result<PaymentReconciliation, PaymentGatewayError> {
        let txid = payment.transaction_id.clone();
        trace!("🔄️💰️ Reconciling payment [{txid}] against order #{order_id}");
        let (order, settled) = self.db.settle_order(order_id, payment).await?;
        if settled {
            debug!("🔄️💰️ Payment [{txid}] settled order #{order_id}");
            self.call_order_paid_hook(&order).await;
        } else {
            info!("🔄️💰️ Payment [{txid}] was already applied to order #{order_id}. No action taken.");
        }
        Ok(PaymentReconciliation { settled, order })
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, PaymentGatewayError> {
        self.db.fetch_order_by_id(order_id).await
    }

    pub async fn orders_for_buyer(&self, email: &str) -> Result<Vec<Order>, PaymentGatewayError> {
        self.db.fetch_orders_for_buyer(email).await
    }

    async fn call_new_order_hook(&self, order: &Order) {
        for emitter in &self.producers.new_order_producer {
            trace!("🔄️📦️ Notifying new order hook subscribers");
            let event = NewOrderEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_order_paid_hook(&self, order: &Order) {
        for emitter in &self.producers.order_paid_producer {
            trace!("🔄️💰️ Notifying order paid hook subscribers");
            let event = OrderPaidEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
