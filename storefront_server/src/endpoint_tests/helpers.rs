use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use chrono::Utc;
use msf_common::{Cents, Secret};
use storefront_engine::db_types::{Order, Role, User};

use crate::{auth::TokenIssuer, config::AuthConfig};

pub fn test_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("an-entirely-unremarkable-test-secret-0123456789".to_string()) }
}

pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(&test_auth_config())
}

pub fn bearer_header(email: &str) -> (&'static str, String) {
    let token = test_issuer().issue_token(email).expect("Error issuing test token");
    ("Authorization", format!("Bearer {token}"))
}

pub fn sample_order(id: i64, buyer_email: &str, paid: bool, transaction_id: Option<&str>) -> Order {
    Order {
        id,
        product_id: 1,
        buyer_email: buyer_email.to_string(),
        quantity: 2,
        price: Cents::from(1999),
        paid,
        transaction_id: transaction_id.map(String::from),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_user(email: &str, role: Role) -> User {
    User { email: email.to_string(), role, created_at: Utc::now(), updated_at: Utc::now() }
}

/// Drives a request through the test app and returns the status with the raw response body.
pub async fn send<S, R, B, E>(app: &S, req: R) -> (StatusCode, String)
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    B: MessageBody,
    E: std::fmt::Debug,
{
    let (_req, res) = test::call_service(app, req).await.into_parts();
    let status = res.status();
    let body = match res.into_body().try_into_bytes() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    };
    (status, body)
}
