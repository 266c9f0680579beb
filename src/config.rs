use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Which persistence backend the process binds to. Selected once at startup
/// via `STORE_BACKEND`; callers never see the difference.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres { database_url: String },
    File { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .as_str()
        {
            "file" => StoreConfig::File {
                path: std::env::var("LOCAL_DB_PATH")
                    .unwrap_or_else(|_| "db.json".into())
                    .into(),
            },
            "postgres" => StoreConfig::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .context("DATABASE_URL is required with STORE_BACKEND=postgres")?,
            },
            other => anyhow::bail!("unknown STORE_BACKEND {other:?} (expected file or postgres)"),
        };

        // No fallback secret: an unset JWT_SECRET is a startup error, never a
        // silently-signed token.
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            store,
            jwt,
        })
    }
}
