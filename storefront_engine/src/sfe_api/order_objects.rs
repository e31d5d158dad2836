use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// The outcome of an order submission.
///
/// `created` is false when an identical submission already existed; in that case `order` is the
/// original record and nothing was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub created: bool,
    pub order: Order,
}
