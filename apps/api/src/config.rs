use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// `DATABASE_URL` is required; `PORT` and `RUST_LOG` have defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_optional_vars_are_absent() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/staffline");
        std::env::remove_var("PORT");
        std::env::remove_var("RUST_LOG");

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, "postgres://localhost/staffline");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }
}
