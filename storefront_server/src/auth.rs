use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::Duration;
use futures::future::{ready, Ready};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    Token,
    UntrustedToken,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

const TOKEN_VALIDITY_HOURS: i64 = 1;

/// The caller identity carried inside an access token, attached to the request context once the
/// token has been verified.
///
/// Handlers take `JwtClaims` as an extractor argument to require authentication: a missing
/// `Authorization` header is rejected as unauthorized, anything that fails verification (bad
/// signature, malformed token, expired token) as forbidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub email: String,
}

/// Signs and verifies access tokens with the server's shared secret.
pub struct TokenIssuer {
    key: Hs256Key,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key }
    }

    /// Issue a new access token for the given email address, valid for one hour from issuance.
    ///
    /// This method DOES NOT verify that the caller may act as `email`. That must be done prior to
    /// calling `issue_token`.
    pub fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        let header = Header::empty().with_token_type("JWT");
        let claims = Claims::new(JwtClaims { email: email.to_string() })
            .set_duration_and_issuance(&TimeOptions::default(), Duration::hours(TOKEN_VALIDITY_HOURS));
        let token = Hs256.token(&header, &claims, &self.key).map_err(|e| AuthError::TokenCreation(format!("{e}")))?;
        Ok(token)
    }

    /// Verifies the token's signature and expiry, returning the embedded identity.
    pub fn decode_access_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted_token =
            UntrustedToken::new(token).map_err(|e| AuthError::InvalidCredential(format!("{e:?}")))?;
        let token: Token<JwtClaims> = Hs256
            .validator(&self.key)
            .validate(&untrusted_token)
            .map_err(|e| AuthError::InvalidCredential(format!("{e}")))?;
        token
            .claims()
            .validate_expiration(&TimeOptions::default())
            .map_err(|e| AuthError::InvalidCredential(format!("{e}")))?;
        debug!("🔑️ Access token validated for {}", token.claims().custom.email);
        Ok(token.claims().custom.clone())
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("No token issuer is configured".to_string()))?;
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingCredential)?;
    let value = header.to_str().map_err(|_| AuthError::MissingCredential)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingCredential)?;
    let claims = issuer.decode_access_token(token)?;
    Ok(claims)
}
