//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Absent when `DATABASE_URL` is unset; the server then keeps data in memory.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Accounts registered with one of these emails are staff.
    pub staff_emails: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            staff_emails: env::var("STAFF_EMAILS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Split a comma separated list, dropping blanks and normalizing case.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_list_is_trimmed_and_lowercased() {
        assert_eq!(
            parse_list(" Ada@Example.com, ,bob@example.com "),
            vec!["ada@example.com".to_string(), "bob@example.com".to_string()]
        );
    }
}
