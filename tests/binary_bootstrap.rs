use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn version_and_help_print_without_configuration() {
    let output = Command::new(env!("CARGO_BIN_EXE_flowscope"))
        .arg("--version")
        .output()
        .expect("run binary");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("flowscope {}", env!("CARGO_PKG_VERSION"))
    );

    let output = Command::new(env!("CARGO_BIN_EXE_flowscope"))
        .arg("--help")
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--env-config"));
    assert!(stdout.contains("--log-file"));
}

#[test]
fn unknown_flags_exit_with_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_flowscope"))
        .arg("--verbose")
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown option `--verbose`"));
    assert!(stderr.contains("Usage: flowscope"));
}

#[test]
fn invalid_environment_file_fails_before_the_terminal_starts() {
    let dir = tempdir().expect("tempdir");
    let env_path = dir.path().join("flowscope-env.yaml");
    let app_path = dir.path().join("flowscope-cfg.yaml");
    let log_path = dir.path().join("debug.log");
    fs::write(&env_path, "environments: {}\n").expect("write env");
    fs::write(&app_path, "tables: []\n").expect("write app");

    let output = Command::new(env!("CARGO_BIN_EXE_flowscope"))
        .arg("--env-config")
        .arg(&env_path)
        .arg("--app-config")
        .arg(&app_path)
        .arg("--debug")
        .arg("--log-file")
        .arg(&log_path)
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no environments configured"),
        "stderr: {stderr}"
    );
    let log = fs::read_to_string(&log_path).expect("read debug log");
    assert!(log.contains("config.load_failed"));
}
