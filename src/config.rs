use std::env;

/// Secret used when `JWT_SECRET` is unset outside production.
pub const LOCAL_JWT_SECRET: &str = "greazebook-local-development-secret";

/// AppConfig
///
/// The gate's configuration, loaded once at startup and never mutated afterwards.
/// `main` reads it to pick the log format and bind address, and `AppState::new`
/// hands the secret to the verifier; it is not kept in the request state.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret fallback.
    pub env: Env,
    // Shared secret that signs the `token` cookie. Handed to the TokenVerifier explicitly.
    pub jwt_secret: String,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
}

/// Env
///
/// Local development versus production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking values for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` is missing, so the gate never starts
    /// verifying credentials against a guessable secret.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            env,
            jwt_secret,
            bind_addr,
        }
    }
}
