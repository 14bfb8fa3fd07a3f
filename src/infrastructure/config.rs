use anyhow::{Context, Result};
use std::env;

/// Signing parameters shared by token issuance and validation.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_hours: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtSettings,
    pub priority_service_url: String,
}

impl AppConfig {
    /// Reads configuration from the environment. `JWT_SECRET` is required,
    /// everything else has a default.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "task-manager-api".to_string());
        let audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "task-manager-clients".to_string());
        let expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRY_HOURS must be a positive integer")?;

        let priority_service_url = env::var("PRIORITY_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5002".to_string());

        Ok(Self {
            host,
            port,
            jwt: JwtSettings {
                secret,
                issuer,
                audience,
                expiry_hours,
            },
            priority_service_url,
        })
    }
}
