use serde::Deserialize;
use std::env;

use crate::utils::time::DEFAULT_UTC_OFFSET_MINUTES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_MEMO_TTL_SECONDS: u64 = 2 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub redis_uri: String,
    /// HS256 secret shared with the hosted auth service that issues access tokens.
    pub jwt_secret: String,
    pub bind_addr: String,
    pub memo_ttl_seconds: u64,
    pub stats_utc_offset_minutes: i32,
    /// `username:password` guarding `/metrics`.
    pub metrics_basic_auth: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml, overridden by APP__SECTION__KEY variables
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "mathpractice".to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".to_string(),
                ))
            }
            Err(_) => {
                tracing::warn!("Using default JWT secret (dev mode only)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let memo_ttl_seconds = match settings.get_int("evaluation.memo_ttl_seconds") {
            Ok(ttl) if ttl > 0 => ttl as u64,
            Ok(ttl) => {
                return Err(config::ConfigError::Message(format!(
                    "evaluation.memo_ttl_seconds must be positive, got {}",
                    ttl
                )))
            }
            Err(_) => DEFAULT_MEMO_TTL_SECONDS,
        };

        let stats_utc_offset_minutes = settings
            .get_int("stats.utc_offset_minutes")
            .map(|minutes| minutes as i32)
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);

        let metrics_basic_auth = settings
            .get_string("metrics.basic_auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| "admin:changeme".to_string());

        Ok(Config {
            mongo_uri,
            mongo_database,
            redis_uri,
            jwt_secret,
            bind_addr,
            memo_ttl_seconds,
            stats_utc_offset_minutes,
            metrics_basic_auth,
        })
    }
}
