//! A thin client for the slice of the Stripe REST API that the storefront uses: creating payment
//! intent authorizations for card charges. Confirmation happens client-side with the returned
//! client secret; the storefront only learns about the outcome when the payment is reconciled
//! against its order.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::PaymentIntent;
pub use error::StripeApiError;
