use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub env_config: Option<PathBuf>,
    pub app_config: Option<PathBuf>,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(CliOptions),
    Help,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliFlag {
    EnvConfig,
    AppConfig,
    Debug,
    LogFile,
    Help,
    Version,
    Unknown,
}

fn parse_cli_flag(input: &str) -> CliFlag {
    match input {
        "--env-config" => CliFlag::EnvConfig,
        "--app-config" => CliFlag::AppConfig,
        "--debug" => CliFlag::Debug,
        "--log-file" => CliFlag::LogFile,
        "-h" | "--help" => CliFlag::Help,
        "-V" | "--version" => CliFlag::Version,
        _ => CliFlag::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: flowscope [options]".to_string(),
        String::new(),
        "Options:".to_string(),
        "  --env-config <path>    Environment file (default flowscope-env.yaml, or $FLOWSCOPE_ENV_CONFIG)"
            .to_string(),
        "  --app-config <path>    Table definitions (default flowscope-cfg.yaml, or $FLOWSCOPE_APP_CONFIG)"
            .to_string(),
        "  --debug                Write JSON debug log lines".to_string(),
        "  --log-file <path>      Debug log file (default flowscope-debug.log)".to_string(),
        "  -h, --help             Show this help".to_string(),
        "  -V, --version          Show the version".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}

/// Accepts `--flag value` and `--flag=value`. Help and version win over everything else.
pub fn parse_cli_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };
        let flag = parse_cli_flag(name);
        let mut value = || -> Result<PathBuf, String> {
            let raw = match inline.clone() {
                Some(raw) => raw,
                None => iter
                    .next()
                    .cloned()
                    .ok_or_else(|| format!("`{name}` requires a path"))?,
            };
            if raw.trim().is_empty() {
                return Err(format!("`{name}` requires a path"));
            }
            Ok(PathBuf::from(raw))
        };
        match flag {
            CliFlag::EnvConfig => options.env_config = Some(value()?),
            CliFlag::AppConfig => options.app_config = Some(value()?),
            CliFlag::LogFile => options.log_file = Some(value()?),
            CliFlag::Debug => options.debug = true,
            CliFlag::Help => return Ok(CliCommand::Help),
            CliFlag::Version => return Ok(CliCommand::Version),
            CliFlag::Unknown => return Err(format!("unknown option `{arg}`\n\n{}", help_text())),
        }
    }
    Ok(CliCommand::Run(options))
}
