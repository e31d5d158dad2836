use std::fmt::Display;

use serde::{Deserialize, Serialize};
use storefront_engine::db_types::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentParams {
    /// Major currency units, as entered by the buyer.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResult {
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// The response to a profile upsert: the stored record and a fresh access token for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUserResult {
    pub result: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilePaymentParams {
    pub transaction_id: String,
    /// Minor currency units, as reported by the payment gateway.
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQueryParams {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
