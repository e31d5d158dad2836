use serde::{Deserialize, Serialize};

/// The slice of a Stripe payment intent object that the storefront cares about.
///
/// `amount` is in minor currency units, as the gateway reports it. The `client_secret` is handed
/// to the storefront client to complete the charge; it is the only field that leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StripeErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
}
