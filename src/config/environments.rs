use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PREFERRED_DEFAULT_ENVIRONMENT: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Environment {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnvConfig {
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

impl EnvConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, environment) in &self.environments {
            if name.trim().is_empty() {
                return Err(ConfigError::Environments(
                    "environment names must be non-empty".to_string(),
                ));
            }
            let url = environment.url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Environments(format!(
                    "environment `{name}` url must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }

    /// Sorted environment names; this is also the Ctrl-E cycling order.
    pub fn names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }

    /// `active` when it names a configured environment, else `local`, else the first name.
    pub fn initial_environment(&self) -> Option<String> {
        if let Some(active) = self
            .active
            .as_deref()
            .filter(|name| self.environments.contains_key(*name))
        {
            return Some(active.to_string());
        }
        if self
            .environments
            .contains_key(PREFERRED_DEFAULT_ENVIRONMENT)
        {
            return Some(PREFERRED_DEFAULT_ENVIRONMENT.to_string());
        }
        self.environments.keys().next().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_config(raw: &str) -> EnvConfig {
        serde_yaml::from_str(raw).expect("parse env config")
    }

    #[test]
    fn initial_environment_prefers_active_then_local_then_first() {
        let config = env_config(
            r#"
environments:
  staging: {url: "http://staging:8080/engine-rest"}
  local: {url: "http://localhost:8080/engine-rest"}
  prod: {url: "https://prod/engine-rest"}
active: prod
"#,
        );
        assert_eq!(config.initial_environment().as_deref(), Some("prod"));

        let mut config = config;
        config.active = Some("missing".to_string());
        assert_eq!(config.initial_environment().as_deref(), Some("local"));

        config.environments.remove("local");
        assert_eq!(config.initial_environment().as_deref(), Some("prod"));

        config.environments.clear();
        assert_eq!(config.initial_environment(), None);
    }

    #[test]
    fn validation_rejects_urls_without_scheme() {
        let config = env_config("environments:\n  local: {url: localhost:8080}\n");
        let err = config.validate().expect_err("scheme is required");
        assert!(err.to_string().contains("local"));
    }
}
