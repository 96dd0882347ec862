pub mod cli;

pub use cli::{help_text, parse_cli_args, CliCommand, CliOptions};

use crate::config::{
    default_app_config_path, default_env_config_path, load_split_config, DEBUG_LOG_FILE_NAME,
};
use crate::shared::Logger;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub env_config: PathBuf,
    pub app_config: PathBuf,
}

pub fn resolve_paths(options: &CliOptions) -> ResolvedPaths {
    ResolvedPaths {
        env_config: options
            .env_config
            .clone()
            .unwrap_or_else(default_env_config_path),
        app_config: options
            .app_config
            .clone()
            .unwrap_or_else(default_app_config_path),
    }
}

/// File logger when `--debug` is given, otherwise a logger that drops everything.
pub fn build_logger(options: &CliOptions) -> Logger {
    if !options.debug {
        return Logger::disabled();
    }
    let path = options
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEBUG_LOG_FILE_NAME));
    Logger::to_file(&path)
}

pub fn version_text() -> String {
    format!("flowscope {}", env!("CARGO_PKG_VERSION"))
}

/// Returns text to print for help/version; `None` once the dashboard has exited.
pub fn run_cli(args: Vec<String>) -> Result<Option<String>, String> {
    let options = match parse_cli_args(&args)? {
        CliCommand::Help => return Ok(Some(help_text())),
        CliCommand::Version => return Ok(Some(version_text())),
        CliCommand::Run(options) => options,
    };
    let paths = resolve_paths(&options);
    let logger = build_logger(&options);
    let config = load_split_config(&paths.env_config, &paths.app_config).map_err(|e| {
        logger.error("config.load_failed", &e.to_string());
        format!("failed to load configuration: {e}")
    })?;
    logger.info(
        "startup",
        &format!(
            "env_config={} app_config={} environments={}",
            paths.env_config.display(),
            paths.app_config.display(),
            config.env.environments.len()
        ),
    );
    crate::tui::run_dashboard(config, paths.env_config, logger)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_paths_override_defaults() {
        let options = CliOptions {
            env_config: Some(PathBuf::from("a.yaml")),
            app_config: Some(PathBuf::from("b.yaml")),
            ..CliOptions::default()
        };
        let paths = resolve_paths(&options);
        assert_eq!(paths.env_config, PathBuf::from("a.yaml"));
        assert_eq!(paths.app_config, PathBuf::from("b.yaml"));
    }

    #[test]
    fn debug_logger_writes_to_the_requested_file() {
        let dir = tempdir().expect("tempdir");
        let log_path = dir.path().join("debug.log");
        let logger = build_logger(&CliOptions {
            debug: true,
            log_file: Some(log_path.clone()),
            ..CliOptions::default()
        });
        logger.info("startup", "hello");
        assert!(fs::read_to_string(&log_path)
            .expect("read log")
            .contains("\"event\":\"startup\""));
        assert!(!build_logger(&CliOptions::default()).is_enabled());
    }

    #[test]
    fn help_and_version_do_not_touch_configuration() {
        let help = run_cli(vec!["--help".to_string()]).expect("help");
        assert!(help.unwrap_or_default().contains("--env-config"));
        let version = run_cli(vec!["--version".to_string()]).expect("version");
        assert_eq!(version, Some(version_text()));
    }

    #[test]
    fn missing_configuration_is_reported_before_the_terminal_starts() {
        let dir = tempdir().expect("tempdir");
        let err = run_cli(vec![
            "--env-config".to_string(),
            dir.path().join("missing-env.yaml").display().to_string(),
        ])
        .expect_err("missing config");
        assert!(err.contains("missing-env.yaml"));
    }
}
