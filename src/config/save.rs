use super::{ConfigError, EnvConfig};
use std::fs;
use std::path::Path;

fn create_parent_dir(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|source| {
        ConfigError::Write {
            path: path.display().to_string(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

/// Writes the environment file only. Table definitions are never written back.
pub fn save_env_config(path: &Path, config: &EnvConfig) -> Result<(), ConfigError> {
    config.validate()?;
    create_parent_dir(path)?;
    let body = serde_yaml::to_string(config).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, body).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    restrict_permissions(path)
}

/// Records `active` in the environment file, keeping everything else as loaded.
pub fn persist_active_environment(
    path: &Path,
    config: &mut EnvConfig,
    active: &str,
) -> Result<(), ConfigError> {
    if !config.environments.contains_key(active) {
        return Err(ConfigError::Environments(format!(
            "cannot activate unknown environment `{active}`"
        )));
    }
    config.active = Some(active.to_string());
    save_env_config(path, config)
}
