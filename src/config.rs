use std::env;

use thiserror::Error;

/// Адрес API по умолчанию (локальный бэкенд портала)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Префикс email, по которому при регистрации запрашивается роль администратора
pub const DEFAULT_ADMIN_EMAIL_PREFIX: &str = "admin@";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Правила пошаговых сценариев
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRules {
    pub admin_email_prefix: String,
}

impl Default for FlowRules {
    fn default() -> Self {
        Self {
            admin_email_prefix: DEFAULT_ADMIN_EMAIL_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub api_base_url: String,
    pub flow: FlowRules,
}

impl BotConfig {
    /// Читает настройки из окружения (после `dotenvy::dotenv()`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = lookup("TELEGRAM_BOT_TOKEN")
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        if telegram_token.trim().is_empty() {
            return Err(ConfigError::Empty("TELEGRAM_BOT_TOKEN"));
        }

        let api_base_url = lookup("API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::Empty("API_BASE_URL"));
        }

        let admin_email_prefix = lookup("ADMIN_EMAIL_PREFIX")
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL_PREFIX.to_string());
        if admin_email_prefix.is_empty() {
            return Err(ConfigError::Empty("ADMIN_EMAIL_PREFIX"));
        }

        Ok(Self {
            telegram_token,
            api_base_url,
            flow: FlowRules { admin_email_prefix },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = BotConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();

        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.flow, FlowRules::default());
    }

    #[test]
    fn missing_token_aborts_startup() {
        let err = BotConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("API_BASE_URL", "https://portal.example/api/"),
            ("ADMIN_EMAIL_PREFIX", "staff@"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://portal.example/api");
        assert_eq!(config.flow.admin_email_prefix, "staff@");
    }

    #[test]
    fn empty_admin_prefix_is_rejected() {
        let err = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("ADMIN_EMAIL_PREFIX", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("ADMIN_EMAIL_PREFIX")));
    }
}
