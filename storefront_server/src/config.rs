use std::{env, io::Write};

use log::*;
use msf_common::Secret;
use serde_json::json;
use stripe_tools::StripeConfig;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_MSF_HOST: &str = "127.0.0.1";
const DEFAULT_MSF_PORT: u16 = 5000;
// HS256 wants at least as many secret bytes as the digest emits.
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If set, this user is promoted to admin on startup. Promotions are otherwise admin-gated,
    /// so a fresh database has no way to mint its first admin without this.
    pub initial_admin: Option<String>,
    /// Payment gateway configuration
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MSF_HOST.to_string(),
            port: DEFAULT_MSF_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            initial_admin: None,
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MSF_HOST").ok().unwrap_or_else(|| DEFAULT_MSF_HOST.into());
        let port = env::var("MSF_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MSF_PORT. {e} Using the default, {DEFAULT_MSF_PORT}, instead."
                    );
                    DEFAULT_MSF_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MSF_PORT);
        let database_url = env::var("MSF_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ MSF_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let initial_admin = env::var("MSF_INITIAL_ADMIN_EMAIL").ok().filter(|s| !s.trim().is_empty());
        let stripe = StripeConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, initial_admin, stripe }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to both sign and verify access tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this, since every access token dies with this process. 🚨️🚨️🚨️"
        );
        let secret = format!("{:032x}{:032x}", rand::random::<u128>(), rand::random::<u128>());
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": &secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                         you are doing it wrong! Set the MSF_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("MSF_JWT_SECRET").map_err(|e| ServerError::InitializeError(format!("{e} [MSF_JWT_SECRET]")))?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ServerError::InitializeError(format!(
                "MSF_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long"
            )));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}
