use super::{AppConfig, ConfigError, EnvConfig, FlowscopeConfig};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_env_config(path: &Path) -> Result<EnvConfig, ConfigError> {
    let config: EnvConfig = read_yaml(path)?;
    config.validate()?;
    Ok(config)
}

pub fn load_app_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = read_yaml(path)?;
    config.catalog().validate()?;
    Ok(config)
}

/// Loads both configuration files; a dashboard without environments cannot start.
pub fn load_split_config(env_path: &Path, app_path: &Path) -> Result<FlowscopeConfig, ConfigError> {
    let env = load_env_config(env_path)?;
    if env.environments.is_empty() {
        return Err(ConfigError::NoEnvironments {
            path: env_path.display().to_string(),
        });
    }
    let app = load_app_config(app_path)?;
    Ok(FlowscopeConfig { env, app })
}
