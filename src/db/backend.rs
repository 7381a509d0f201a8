use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection};

use crate::config::DatabaseConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Storage engines the server can run against, picked from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn detect(url: &str) -> Result<Self> {
        let normalized = url.trim().to_ascii_lowercase();
        if normalized.starts_with("postgres://") || normalized.starts_with("postgresql://") {
            return Ok(Backend::Postgres);
        }
        if normalized.starts_with("sqlite:") {
            return Ok(Backend::Sqlite);
        }
        anyhow::bail!(
            "unsupported database url '{}'; expected scheme postgres://, postgresql://, or sqlite:",
            redact_url(url)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }

    pub fn connect_options(self, cfg: &DatabaseConfig) -> ConnectOptions {
        let in_memory = self == Backend::Sqlite && is_in_memory(&cfg.url);
        let (max, min) = if in_memory {
            // Every pooled connection to `:memory:` would open its own empty database.
            (1, 1)
        } else {
            (cfg.max_connections, cfg.min_idle)
        };

        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(max)
            .min_connections(min)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);
        if in_memory {
            // Recycling the only connection drops the database with it.
            options.max_lifetime(None).idle_timeout(None);
        }
        options
    }

    pub async fn prepare(self, db: &DatabaseConnection) -> Result<()> {
        if self == Backend::Sqlite {
            db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
            db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
                .await?;
        }
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}
