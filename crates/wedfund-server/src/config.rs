use std::net::SocketAddr;

use anyhow::{Context, bail};
use tracing::warn;

/// Placeholder secrets that only make sense on a developer machine.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const MAX_SESSION_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub target_per_person: i64,
    pub session_days: i64,
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            jwt_secret: "dev-secret-change-me".into(),
            target_per_person: 5000,
            session_days: 30,
            seed: true,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("WEDFUND_PORT") {
            Some(v) => v.parse().context("WEDFUND_PORT must be a port number")?,
            None => defaults.port,
        };
        let target_per_person = match lookup("WEDFUND_TARGET_PER_PERSON") {
            Some(v) => v
                .parse()
                .context("WEDFUND_TARGET_PER_PERSON must be an integer")?,
            None => defaults.target_per_person,
        };
        if target_per_person <= 0 {
            bail!("WEDFUND_TARGET_PER_PERSON must be greater than zero");
        }
        let session_days = match lookup("WEDFUND_SESSION_DAYS") {
            Some(v) => v.parse().context("WEDFUND_SESSION_DAYS must be an integer")?,
            None => defaults.session_days,
        };
        if !(1..=MAX_SESSION_DAYS).contains(&session_days) {
            bail!("WEDFUND_SESSION_DAYS must be between 1 and {}", MAX_SESSION_DAYS);
        }
        let seed = match lookup("WEDFUND_SEED").as_deref() {
            None => defaults.seed,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => bail!("WEDFUND_SEED must be true or false, got '{}'", other),
        };

        Ok(Self {
            host: lookup("WEDFUND_HOST").unwrap_or(defaults.host),
            port,
            jwt_secret: lookup("WEDFUND_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            target_per_person,
            session_days,
            seed,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn warn_if_insecure(&self) {
        if self.jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str()) {
            warn!("WEDFUND_JWT_SECRET is unset or a placeholder; set it outside development");
        }
    }
}
