use std::sync::Arc;

use log::*;
use msf_common::{Cents, USD_CURRENCY_CODE};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::de::DeserializeOwned;

use crate::{
    config::StripeConfig,
    data_objects::{PaymentIntent, StripeErrorEnvelope},
    StripeApiError,
};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let val = HeaderValue::from_str(&format!("Bearer {}", config.secret_key.reveal()))
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a form-encoded request to the gateway and deserializes the JSON response.
    ///
    /// Stripe error responses carry a JSON error envelope; its message is surfaced in
    /// [`StripeApiError::QueryError`].
    pub async fn form_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: &[(&str, String)],
        idempotency_key: Option<&str>,
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending gateway query: {url}");
        let mut req = self.client.request(method, url).form(form);
        if let Some(key) = idempotency_key {
            req = req.header("Idempotency-Key", key);
        }
        let response = req.send().await.map_err(|e| StripeApiError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Gateway query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| StripeApiError::RequestError(e.to_string()))?;
            let message = serde_json::from_str::<StripeErrorEnvelope>(&body)
                .map(|env| format!("{}: {}", env.error.error_type, env.error.message))
                .unwrap_or(body);
            Err(StripeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Asks the gateway to authorize a card charge for the given amount.
    ///
    /// Charge creation is not idempotent on the gateway side, so each call carries a fresh
    /// `Idempotency-Key`. Transport-level retries of the same request must reuse the key.
    pub async fn create_payment_intent(&self, amount: Cents) -> Result<PaymentIntent, StripeApiError> {
        if !amount.is_positive() {
            return Err(StripeApiError::InvalidCurrencyAmount(amount.to_string()));
        }
        let idempotency_key = format!("msf_pi_{:032x}", rand::random::<u128>());
        let form = [
            ("amount", amount.value().to_string()),
            ("currency", USD_CURRENCY_CODE.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];
        debug!("Creating payment intent for {amount}");
        let intent: PaymentIntent =
            self.form_query(Method::POST, "/payment_intents", &form, Some(&idempotency_key)).await?;
        info!("Created payment intent {} for {amount}", intent.id);
        Ok(intent)
    }
}
