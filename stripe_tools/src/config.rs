use std::time::Duration;

use log::*;
use msf_common::Secret;

const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
const DEFAULT_STRIPE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
    /// Applied to every gateway call. A gateway that stalls fails the request rather than hanging
    /// the worker indefinitely.
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            secret_key: Secret::default(),
            timeout: Duration::from_secs(DEFAULT_STRIPE_TIMEOUT_SECS),
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("MSF_STRIPE_API_URL").unwrap_or_else(|_| DEFAULT_STRIPE_API_URL.to_string());
        let secret_key = Secret::new(std::env::var("MSF_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("MSF_STRIPE_SECRET_KEY not set. Payment intent requests will be rejected by the gateway.");
            "sk_test_00000000000000".to_string()
        }));
        let timeout = std::env::var("MSF_STRIPE_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for MSF_STRIPE_TIMEOUT ({s}): {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_STRIPE_TIMEOUT_SECS));
        Self { api_url, secret_key, timeout }
    }
}
