use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub const DEFAULT_LOG_FILE: &str = "eval_debug.log";

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Opens `path` for appending. Later calls keep the first file.
pub fn init_at(path: &Path) {
    if let Ok(mut logger) = LOGGER.lock()
        && logger.is_none()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *logger = Some(file);
    }
}

/// No-op until `init_at` has run.
pub fn log(message: &str) {
    if let Ok(mut logger) = LOGGER.lock()
        && let Some(file) = logger.as_mut()
    {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {}", timestamp, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_before_init_is_noop() {
        log("dropped");
    }

    #[test]
    fn test_logger_writes_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        init_at(&path);
        log("Test log message");

        // Another test may have opened the logger first.
        if let Ok(content) = std::fs::read_to_string(&path) {
            assert!(content.contains("] Test log message"));
        }
    }
}
