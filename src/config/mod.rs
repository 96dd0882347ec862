pub mod environments;
pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod tables;

pub use environments::{EnvConfig, Environment, PREFERRED_DEFAULT_ENVIRONMENT};
pub use error::ConfigError;
pub use load::{load_app_config, load_env_config, load_split_config};
pub use paths::{
    default_app_config_path, default_env_config_path, APP_CONFIG_FILE_NAME, DEBUG_LOG_FILE_NAME,
    ENV_CONFIG_FILE_NAME,
};
pub use save::{persist_active_environment, save_env_config};
pub use tables::{
    Align, ColumnDef, DrillDownDef, DrillRule, DrillTarget, InputType, TableCatalog, TableDef,
    WidthSpec, DEFAULT_DRILL_COLUMN,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableDef>,
    /// Names suggested while editing `user` inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
}

impl AppConfig {
    pub fn catalog(&self) -> TableCatalog {
        TableCatalog::new(self.tables.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowscopeConfig {
    pub env: EnvConfig,
    pub app: AppConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ENV_YAML: &str = r##"
environments:
  local:
    url: http://localhost:8080/engine-rest
    username: demo
    password: demo
    ui_color: "#00A0FF"
  prod:
    url: https://engine.example.com/engine-rest
active: local
"##;

    const APP_YAML: &str = r#"
tables:
  - name: process-definitions
    columns:
      - {name: key, width: 30%}
      - {name: name, width: 40%}
      - {name: version}
    drilldown:
      - {target: process-instance, param: processDefinitionKey, column: key}
  - name: process-variables
    columns:
      - {name: name}
      - {name: value, editable: true, input_type: auto}
users: [demo, john, mary]
"#;

    #[test]
    fn split_config_loads_both_files() {
        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(ENV_CONFIG_FILE_NAME);
        let app_path = dir.path().join(APP_CONFIG_FILE_NAME);
        fs::write(&env_path, ENV_YAML).expect("write env");
        fs::write(&app_path, APP_YAML).expect("write app");

        let config = load_split_config(&env_path, &app_path).expect("load config");
        assert_eq!(config.env.names(), vec!["local", "prod"]);
        assert_eq!(
            config.env.environments["local"].ui_color.as_deref(),
            Some("#00A0FF")
        );
        let catalog = config.app.catalog();
        let variables = catalog.find("process-variables").expect("variables table");
        assert!(variables.columns[1].editable);
        assert_eq!(variables.columns[1].input_type, InputType::Auto);
        assert_eq!(config.app.users, vec!["demo", "john", "mary"]);
    }

    #[test]
    fn split_config_requires_an_environment() {
        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(ENV_CONFIG_FILE_NAME);
        let app_path = dir.path().join(APP_CONFIG_FILE_NAME);
        fs::write(&env_path, "environments: {}\n").expect("write env");
        fs::write(&app_path, APP_YAML).expect("write app");

        let err = load_split_config(&env_path, &app_path).expect_err("no environments");
        assert!(matches!(err, ConfigError::NoEnvironments { .. }));
    }

    #[test]
    fn missing_file_reports_read_error_with_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.yaml");
        let err = load_app_config(&path).expect_err("missing file");
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn persisting_active_environment_leaves_table_file_untouched() {
        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(ENV_CONFIG_FILE_NAME);
        let app_path = dir.path().join(APP_CONFIG_FILE_NAME);
        fs::write(&env_path, ENV_YAML).expect("write env");
        fs::write(&app_path, APP_YAML).expect("write app");

        let mut config = load_split_config(&env_path, &app_path).expect("load config");
        persist_active_environment(&env_path, &mut config.env, "prod").expect("persist");

        let reloaded = load_env_config(&env_path).expect("reload env");
        assert_eq!(reloaded.active.as_deref(), Some("prod"));
        assert_eq!(reloaded.environments.len(), 2);
        assert_eq!(fs::read_to_string(&app_path).expect("read app"), APP_YAML);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&env_path).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn persisting_unknown_environment_fails() {
        let dir = tempdir().expect("tempdir");
        let env_path = dir.path().join(ENV_CONFIG_FILE_NAME);
        let mut config: EnvConfig = serde_yaml::from_str(ENV_YAML).expect("parse env");
        let err = persist_active_environment(&env_path, &mut config, "qa").expect_err("unknown");
        assert!(err.to_string().contains("qa"));
        assert!(!env_path.exists());
    }
}
