use std::time::Duration;

use crate::{
    error::{AppError, Result},
    models::prompt::PromptStrategy,
};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_MAX_RETRIES: u32 = 1;

/// Settings resolved once at cold start and handed to the handler.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// `None` keeps the function deployable without a key; every request then fails with 500.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub strategy: PromptStrategy,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            strategy: PromptStrategy::default(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let timeout = match var("GEMINI_TIMEOUT_SECS") {
            Some(raw) => match parse_number("GEMINI_TIMEOUT_SECS", &raw)? {
                0 => return Err(AppError::Config("GEMINI_TIMEOUT_SECS must be at least 1".into())),
                secs => Duration::from_secs(secs),
            },
            None => defaults.timeout,
        };
        let max_retries = match var("GEMINI_MAX_RETRIES") {
            Some(raw) => parse_number("GEMINI_MAX_RETRIES", &raw)?,
            None => defaults.max_retries,
        };
        let strategy = match var("MIKU_PROMPT_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => defaults.strategy,
        };

        Ok(Self {
            api_key: var("GEMINI_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: var("GEMINI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout,
            max_retries,
            strategy,
        })
    }

    /// The credential, or the error every request reports while it is missing.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("API key not configured".into()))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::Config(format!("{name} must be a non-negative integer, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let cfg = ChatConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(8));
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.strategy, PromptStrategy::FullHistory);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ChatConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k-123"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("GEMINI_MAX_RETRIES", "0"),
            ("MIKU_PROMPT_STRATEGY", "last-message"),
        ]))
        .unwrap();
        assert_eq!(cfg.require_api_key().unwrap(), "k-123");
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.base_url, "http://localhost:8080/v1beta");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.strategy, PromptStrategy::LastMessage);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = ChatConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(matches!(cfg.require_api_key(), Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_unknown_strategy_and_bad_numbers() {
        assert!(matches!(
            ChatConfig::from_lookup(lookup(&[("MIKU_PROMPT_STRATEGY", "shuffle")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            ChatConfig::from_lookup(lookup(&[("GEMINI_TIMEOUT_SECS", "soon")])),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        match ChatConfig::from_lookup(lookup(&[("GEMINI_TIMEOUT_SECS", "0")])) {
            Err(AppError::Config(msg)) => assert!(msg.contains("GEMINI_TIMEOUT_SECS")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
