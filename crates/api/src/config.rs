//! Application configuration

use std::env;

use crate::auth::ACCESS_TOKEN_EXPIRE_MINUTES;

/// Minimum length of the token signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    /// `None` allows any origin
    pub cors_allowed_origins: Option<Vec<String>>,

    // Authentication
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub required_role: String,
    pub credentials_file: Option<String>,

    // Search backend
    pub search_backend_url: String,
    pub search_request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5050".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok().map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            }),

            // Authentication
            jwt_secret: {
                let secret = env::var("JWT_SECRET_KEY")
                    .map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?;
                if secret.len() < MIN_SECRET_LEN {
                    return Err(ConfigError::WeakSecret(
                        "JWT_SECRET_KEY must be at least 32 characters",
                    ));
                }
                secret
            },
            access_token_expire_minutes: {
                let minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                    .unwrap_or_else(|_| ACCESS_TOKEN_EXPIRE_MINUTES.to_string())
                    .parse::<i64>()
                    .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?;
                if minutes <= 0 {
                    return Err(ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"));
                }
                minutes
            },
            required_role: env::var("REQUIRED_ROLE").unwrap_or_else(|_| "Viewer".to_string()),
            credentials_file: env::var("CREDENTIALS_FILE").ok(),

            // Search backend
            search_backend_url: env::var("SEARCH_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1/search".to_string()),
            search_request_timeout_ms: env::var("SEARCH_REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "45000".to_string())
                .parse()
                .unwrap_or(45000),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "JWT_SECRET_KEY",
        "ACCESS_TOKEN_EXPIRE_MINUTES",
        "REQUIRED_ROLE",
        "CORS_ALLOWED_ORIGINS",
        "BIND_ADDRESS",
        "CREDENTIALS_FILE",
        "SEARCH_BACKEND_URL",
        "SEARCH_REQUEST_TIMEOUT_MS",
    ];

    fn cleanup_config() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn setup_minimal_config() {
        cleanup_config();
        env::set_var(
            "JWT_SECRET_KEY",
            "test-jwt-secret-must-be-at-least-32-characters-long",
        );
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_fatal() {
        cleanup_config();

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET_KEY"))));
    }

    #[test]
    #[serial]
    fn test_short_secret_is_rejected() {
        cleanup_config();
        env::set_var("JWT_SECRET_KEY", "too-short");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::WeakSecret(_))));

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_defaults() {
        setup_minimal_config();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:5050");
        assert_eq!(config.access_token_expire_minutes, 30);
        assert_eq!(config.required_role, "Viewer");
        assert!(config.cors_allowed_origins.is_none());
        assert!(config.credentials_file.is_none());
        assert_eq!(config.search_request_timeout_ms, 45000);

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_token_lifetime_must_be_positive() {
        setup_minimal_config();

        env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))
        ));

        env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "half an hour");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))
        ));

        env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "15");
        assert_eq!(Config::from_env().unwrap().access_token_expire_minutes, 15);

        cleanup_config();
    }

    #[test]
    #[serial]
    fn test_cors_origins_are_split() {
        setup_minimal_config();
        env::set_var(
            "CORS_ALLOWED_ORIGINS",
            "https://app.example.com, https://admin.example.com,",
        );

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec![
                "https://app.example.com".to_string(),
                "https://admin.example.com".to_string(),
            ])
        );

        cleanup_config();
    }
}
