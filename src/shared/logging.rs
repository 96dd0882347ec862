use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
enum LogSink {
    Disabled,
    File(PathBuf),
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Logger handle passed to whoever needs it. Disabled loggers drop every line.
#[derive(Debug, Clone)]
pub struct Logger {
    sink: LogSink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Logger {
    pub fn disabled() -> Self {
        Self {
            sink: LogSink::Disabled,
        }
    }

    pub fn to_file(path: &Path) -> Self {
        Self {
            sink: LogSink::File(path.to_path_buf()),
        }
    }

    /// Keeps lines in memory; the returned buffer sees every line written.
    pub fn in_memory() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sink: LogSink::Memory(Arc::clone(&lines)),
            },
            lines,
        )
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.sink, LogSink::Disabled)
    }

    pub fn debug(&self, event: &str, message: &str) {
        self.log(LogLevel::Debug, event, message);
    }

    pub fn info(&self, event: &str, message: &str) {
        self.log(LogLevel::Info, event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.log(LogLevel::Warn, event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.log(LogLevel::Error, event, message);
    }

    pub fn log(&self, level: LogLevel, event: &str, message: &str) {
        if !self.is_enabled() {
            return;
        }
        let payload = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "level": level.as_str(),
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };

        match &self.sink {
            LogSink::Disabled => {}
            LogSink::File(path) => append_line(path, &line),
            LogSink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }
}

fn append_line(path: &Path, line: &str) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
