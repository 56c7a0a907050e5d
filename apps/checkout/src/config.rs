use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::{DEFAULT_INTAKE_URL, DEFAULT_PAYMENT_URL};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "checkout.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub page_url: String,
    pub intake_url: String,
    pub payment_url: String,
    pub session_database_url: String,
    pub sample_preview_seconds: u64,
    pub handoff_grace_ms: u64,
    pub session_retention_days: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_url: "https://cantodefe.com/checkout".into(),
            intake_url: DEFAULT_INTAKE_URL.into(),
            payment_url: DEFAULT_PAYMENT_URL.into(),
            session_database_url: "sqlite://./data/checkout-session.db".into(),
            sample_preview_seconds: 30,
            handoff_grace_ms: 1500,
            session_retention_days: 7,
        }
    }
}

impl Settings {
    pub fn page_location(&self) -> anyhow::Result<Url> {
        Url::parse(&self.page_url).with_context(|| format!("invalid page_url '{}'", self.page_url))
    }

    pub fn intake_endpoint(&self) -> anyhow::Result<Url> {
        Url::parse(&self.intake_url)
            .with_context(|| format!("invalid intake_url '{}'", self.intake_url))
    }

    pub fn payment_location(&self) -> anyhow::Result<Url> {
        Url::parse(&self.payment_url)
            .with_context(|| format!("invalid payment_url '{}'", self.payment_url))
    }

    pub fn sample_preview(&self) -> Duration {
        Duration::from_secs(self.sample_preview_seconds.max(1))
    }

    pub fn handoff_grace(&self) -> Duration {
        Duration::from_millis(self.handoff_grace_ms)
    }

    pub fn session_retention(&self) -> Duration {
        Duration::from_secs(self.session_retention_days.saturating_mul(24 * 60 * 60))
    }
}

/// Defaults, then `checkout.toml` (or `path`), then environment overrides.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config file")
            }
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    let text = |key: &str| file_cfg.get(key).and_then(|v| v.as_str()).map(str::to_owned);
    let number = |key: &str| {
        file_cfg.get(key).and_then(|v| match v {
            toml::Value::Integer(n) => u64::try_from(*n).ok(),
            toml::Value::String(s) => s.parse().ok(),
            _ => None,
        })
    };

    if let Some(v) = text("page_url") {
        settings.page_url = v;
    }
    if let Some(v) = text("intake_url") {
        settings.intake_url = v;
    }
    if let Some(v) = text("payment_url") {
        settings.payment_url = v;
    }
    if let Some(v) = text("session_database_url") {
        settings.session_database_url = v;
    }
    if let Some(v) = number("sample_preview_seconds") {
        settings.sample_preview_seconds = v;
    }
    if let Some(v) = number("handoff_grace_ms") {
        settings.handoff_grace_ms = v;
    }
    if let Some(v) = number("session_retention_days") {
        settings.session_retention_days = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let pick = |plain: &str, namespaced: &str| var(namespaced).or_else(|| var(plain));

    if let Some(v) = pick("CHECKOUT_PAGE_URL", "APP__PAGE_URL") {
        settings.page_url = v;
    }
    if let Some(v) = pick("CHECKOUT_INTAKE_URL", "APP__INTAKE_URL") {
        settings.intake_url = v;
    }
    if let Some(v) = pick("CHECKOUT_PAYMENT_URL", "APP__PAYMENT_URL") {
        settings.payment_url = v;
    }
    if let Some(v) = pick("CHECKOUT_SESSION_DATABASE_URL", "APP__SESSION_DATABASE_URL") {
        settings.session_database_url = v;
    }
    if let Some(v) = pick("CHECKOUT_SAMPLE_PREVIEW_SECONDS", "APP__SAMPLE_PREVIEW_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.sample_preview_seconds = parsed;
        }
    }
    if let Some(v) = pick("CHECKOUT_HANDOFF_GRACE_MS", "APP__HANDOFF_GRACE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.handoff_grace_ms = parsed;
        }
    }
    if let Some(v) = pick("CHECKOUT_SESSION_RETENTION_DAYS", "APP__SESSION_RETENTION_DAYS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.session_retention_days = parsed;
        }
    }
}

/// Turns a bare path or `sqlite:` shorthand into a `sqlite://` url.
/// Directory creation is left to the store that opens the file.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return Settings::default().session_database_url;
    }
    if raw.starts_with("sqlite::memory:") || raw.contains("mode=memory") || raw.contains("://") {
        return raw.to_string();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw).replace('\\', "/");
    format!("sqlite://{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_plain_file_path_to_sqlite_url() {
        assert_eq!(
            normalize_database_url("./data/session.db"),
            "sqlite://./data/session.db"
        );
        assert_eq!(
            normalize_database_url("sqlite:data\\session.db"),
            "sqlite://data/session.db"
        );
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_database_url("sqlite:file:session?mode=memory"),
            "sqlite:file:session?mode=memory"
        );
        assert_eq!(
            normalize_database_url("  "),
            Settings::default().session_database_url
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let raw = r#"
            payment_url = "https://pay.example/live"
            sample_preview_seconds = 12
            handoff_grace_ms = "250"
            session_retention_days = 2
        "#;
        let file_cfg: HashMap<String, toml::Value> = toml::from_str(raw).expect("toml");
        let mut settings = Settings::default();
        apply_file_values(&mut settings, &file_cfg);

        assert_eq!(settings.payment_url, "https://pay.example/live");
        assert_eq!(settings.sample_preview_seconds, 12);
        assert_eq!(settings.handoff_grace_ms, 250);
        assert_eq!(settings.session_retention(), Duration::from_secs(2 * 24 * 60 * 60));
        assert_eq!(settings.intake_url, DEFAULT_INTAKE_URL);
    }

    #[test]
    fn namespaced_env_wins_over_plain_env() {
        let env: HashMap<&str, &str> = [
            ("CHECKOUT_INTAKE_URL", "https://plain.example/form"),
            ("APP__INTAKE_URL", "https://namespaced.example/form"),
            ("CHECKOUT_HANDOFF_GRACE_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.intake_url, "https://namespaced.example/form");
        assert_eq!(settings.handoff_grace_ms, Settings::default().handoff_grace_ms);
    }

    #[test]
    fn default_urls_parse() {
        let settings = Settings::default();
        settings.page_location().expect("page");
        settings.intake_endpoint().expect("intake");
        settings.payment_location().expect("payment");
    }
}
