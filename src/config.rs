use thiserror::Error;

/// Fallback signing secret for local development only
const DEV_TOKEN_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Password given to the bootstrapped admin account
    pub bootstrap_password: String,
    /// Secret used to sign and verify bearer tokens
    pub token_secret: String,
    /// Bearer token lifetime in seconds
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bootstrap_password: "1234".to_string(),
            token_secret: DEV_TOKEN_SECRET.to_string(),
            token_ttl_seconds: 86400, // 24 hours
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let token_secret = match std::env::var("TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                tracing::warn!(
                    "TOKEN_SECRET is not set; using the insecure development default. \
                     Set TOKEN_SECRET in production."
                );
                DEV_TOKEN_SECRET.to_string()
            }
        };

        let token_ttl_seconds = std::env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let bootstrap_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "1234".to_string());

        let config = Config {
            auth: AuthConfig {
                bootstrap_password,
                token_secret,
                token_ttl_seconds,
            },
            server: ServerConfig {
                bind_address,
                data_dir,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "TOKEN_SECRET cannot be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "TOKEN_TTL_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.auth.bootstrap_password.is_empty() {
            return Err(ConfigError::ValidationError(
                "ADMIN_PASSWORD cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
