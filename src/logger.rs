use std::fs::{create_dir_all, read_to_string};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tklog::{Format, LEVEL, LOG};

static LOG_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();
static FILE_LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);

fn resolve_log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("MIKAN_LOG_FILE") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    #[cfg(target_os = "windows")]
    if let Some(app_data) = std::env::var_os("APPDATA") {
        return Some(
            PathBuf::from(app_data)
                .join("Mikan")
                .join("logs")
                .join("debug.log"),
        );
    }

    #[cfg(target_os = "macos")]
    if let Some(home) = std::env::var_os("HOME") {
        return Some(
            PathBuf::from(home)
                .join("Library")
                .join("Logs")
                .join("Mikan")
                .join("debug.log"),
        );
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Some(
            PathBuf::from(home)
                .join(".mikan")
                .join("logs")
                .join("debug.log"),
        );
    }

    Some(std::env::temp_dir().join("mikan-debug.log"))
}

fn logging_marker_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    if let Some(app_data) = std::env::var_os("APPDATA") {
        return Some(PathBuf::from(app_data).join("mikan").join("logging_enabled"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Some(PathBuf::from(home).join(".mikan").join("logging_enabled"));
    }

    Some(std::env::temp_dir().join("mikan-logging-enabled"))
}

fn persisted_logging_enabled() -> bool {
    // An explicit override always wins over the marker file.
    if std::env::var_os("MIKAN_LOG_FILE").is_some_and(|value| !value.is_empty()) {
        return true;
    }

    let Some(path) = logging_marker_path() else {
        return false;
    };

    let Ok(raw) = read_to_string(path) else {
        return false;
    };

    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn log_file_path() -> Option<PathBuf> {
    LOG_PATH.get_or_init(resolve_log_path).clone()
}

pub fn file_logging_enabled() -> bool {
    FILE_LOGGING_ENABLED.load(Ordering::Relaxed)
}

fn enable_file_logging() {
    let Some(path) = log_file_path() else {
        eprintln!("[log] cannot enable file logging: no writable path");
        return;
    };

    if let Some(parent) = path.parent()
        && let Err(err) = create_dir_all(parent)
    {
        eprintln!(
            "[log] failed to create log dir: {} | {}",
            parent.display(),
            err
        );
        return;
    }

    let path_string = path.to_string_lossy().to_string();
    LOG.set_cutmode_by_size(&path_string, 10 * 1024 * 1024, 5, true);
    FILE_LOGGING_ENABLED.store(true, Ordering::Relaxed);
}

pub fn initialize() {
    LOG.set_level(LEVEL::Debug)
        .set_console(true)
        .set_format(Format::LevelFlag | Format::Date | Format::Time | Format::ShortFileName)
        .set_formatter("{level}{time} {file}:{message}\n");

    if persisted_logging_enabled() {
        enable_file_logging();
    }
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        tklog::debug!(format!($($arg)*));
    }};
}
