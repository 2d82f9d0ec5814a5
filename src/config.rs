use anyhow::Context;
use serde::Deserialize;

use crate::catalog::ImportPolicy;
use crate::fridge::DEFAULT_EXPIRY_WARNING_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub import_policy: ImportPolicy,
    pub expiry_warning_days: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults, malformed
    /// ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: '{}'", v))?,
            None => 10,
        };
        let import_policy = match lookup("IMPORT_POLICY") {
            Some(v) => v.parse::<ImportPolicy>().context("IMPORT_POLICY")?,
            None => ImportPolicy::default(),
        };
        let expiry_warning_days = match lookup("EXPIRY_WARNING_DAYS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("EXPIRY_WARNING_DAYS is not a number: '{}'", v))?,
            None => DEFAULT_EXPIRY_WARNING_DAYS,
        };
        Ok(Self {
            database_url,
            db_max_connections,
            import_policy,
            expiry_warning_days,
        })
    }
}
