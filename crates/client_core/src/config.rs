use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: 15,
            user_agent: concat!("episode-viewer/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Checks the settings and returns the parsed base url.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(self.base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

/// Defaults, then `viewer.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientConfig, ConfigError> {
    let mut settings = ClientConfig::default();
    let path = Path::new(SETTINGS_FILE);
    if let Ok(raw) = fs::read_to_string(path) {
        apply_file_overrides(&mut settings, &raw, &path.display().to_string())?;
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

pub fn apply_file_overrides(
    settings: &mut ClientConfig,
    raw: &str,
    path: &str,
) -> Result<(), ConfigError> {
    let file_cfg: FileSettings = toml::from_str(raw).map_err(|source| ConfigError::File {
        path: path.to_string(),
        source,
    })?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.user_agent {
        settings.user_agent = v;
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("CATALOG_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = non_empty("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => tracing::warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS: {err}"),
        }
    }

    if let Some(v) = non_empty("APP__USER_AGENT") {
        settings.user_agent = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_point_at_public_catalog() {
        let settings = ClientConfig::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_then_env_precedence() {
        let mut settings = ClientConfig::default();
        apply_file_overrides(
            &mut settings,
            "base_url = \"http://file.test/api\"\nrequest_timeout_secs = 4\n",
            "viewer.toml",
        )
        .expect("parse file");
        assert_eq!(settings.base_url, "http://file.test/api");
        assert_eq!(settings.request_timeout_secs, 4);

        let env: HashMap<&str, &str> = [
            ("CATALOG_BASE_URL", "http://legacy.test/api"),
            ("APP__BASE_URL", "http://env.test/api"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();
        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.base_url, "http://env.test/api");
        assert_eq!(settings.request_timeout_secs, 4);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut settings = ClientConfig::default();
        apply_env_overrides(&mut settings, |_| Some("   ".to_string()));
        assert_eq!(settings, ClientConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut settings = ClientConfig::default();
        let err = apply_file_overrides(&mut settings, "base_url = ", "custom.toml")
            .expect_err("invalid toml");
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn validate_rejects_bad_urls_and_zero_timeout() {
        assert!(matches!(
            ClientConfig::with_base_url("not a url").validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::with_base_url("ftp://catalog.test").validate(),
            Err(ConfigError::UnsupportedScheme(_))
        ));

        let mut settings = ClientConfig::default();
        settings.request_timeout_secs = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::ZeroTimeout)));
    }
}
