use std::path::PathBuf;

pub const ENV_CONFIG_FILE_NAME: &str = "flowscope-env.yaml";
pub const APP_CONFIG_FILE_NAME: &str = "flowscope-cfg.yaml";
pub const DEBUG_LOG_FILE_NAME: &str = "flowscope-debug.log";

pub const ENV_CONFIG_PATH_VAR: &str = "FLOWSCOPE_ENV_CONFIG";
pub const APP_CONFIG_PATH_VAR: &str = "FLOWSCOPE_APP_CONFIG";

fn path_from_env_or(var: &str, file_name: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Environment file: `$FLOWSCOPE_ENV_CONFIG`, else `flowscope-env.yaml` in the working directory.
pub fn default_env_config_path() -> PathBuf {
    path_from_env_or(ENV_CONFIG_PATH_VAR, ENV_CONFIG_FILE_NAME)
}

pub fn default_app_config_path() -> PathBuf {
    path_from_env_or(APP_CONFIG_PATH_VAR, APP_CONFIG_FILE_NAME)
}
