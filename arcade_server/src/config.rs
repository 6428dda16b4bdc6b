use std::env;

use log::*;
use nas_common::Secret;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_NAS_HOST: &str = "127.0.0.1";
const DEFAULT_NAS_PORT: u16 = 4480;
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_NAS_HOST.to_string(),
            port: DEFAULT_NAS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("NAS_HOST").ok().unwrap_or_else(|| DEFAULT_NAS_HOST.into());
        let port = env::var("NAS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for NAS_PORT. {e} Using the default, {DEFAULT_NAS_PORT}, instead."
                    );
                    DEFAULT_NAS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_NAS_PORT);
        let database_url = env::var("NAS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ NAS_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
/// The secret used to sign and verify access tokens. Must be at least 32 characters.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. Every issued \
             access token will be invalidated when the server restarts. Set the NAS_JWT_SECRET environment variable \
             on production instances. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("NAS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [NAS_JWT_SECRET]")))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ServerError::ConfigurationError(format!(
                "NAS_JWT_SECRET must be at least {MIN_SECRET_LEN} characters long."
            )));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}
