use std::{env, time::Duration};

use anyhow::{Context, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub jwt_secret: Option<String>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match env::var("APP_STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            Ok("postgres") | Err(_) => StoreKind::Postgres,
            Ok(other) => bail!("unknown APP_STORE `{other}`, expected `postgres` or `memory`"),
        };
        let database_url = env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when APP_STORE is postgres");
        }
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let request_timeout = match env::var("APP_REQUEST_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .context("APP_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => Duration::from_secs(30),
        };
        Ok(Self {
            store,
            port,
            database_url,
            host,
            jwt_secret,
            request_timeout,
        })
    }

    /// Returns the database url, failing when none was configured.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL is not set")
    }
}
