use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);

pub fn init_logging(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(log_dir)?;

    let log_file = log_dir.join(format!("writeflow_{}.log", Local::now().format("%Y-%m-%d")));

    let mut guard = LOG_FILE.lock().unwrap();
    *guard = Some(log_file.clone());
    drop(guard);

    tracing::info!("Logging initialized. Log file: {:?}", log_file);

    Ok(())
}

pub fn log_to_file(level: &str, target: &str, message: &str) {
    if let Ok(guard) = LOG_FILE.lock() {
        if let Some(ref path) = *guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                let _ = writeln!(file, "{} [{}] {}: {}", timestamp, level, target, message);
            }
        }
    }
}

#[macro_export]
macro_rules! log_info {
    ($target:expr, $($arg:tt)*) => ({
        let msg = format!($($arg)*);
        $crate::logging::log_to_file("INFO", $target, &msg);
        tracing::info!(target: $target, "{}", msg);
    });
}

#[macro_export]
macro_rules! log_warn {
    ($target:expr, $($arg:tt)*) => ({
        let msg = format!($($arg)*);
        $crate::logging::log_to_file("WARN", $target, &msg);
        tracing::warn!(target: $target, "{}", msg);
    });
}

#[macro_export]
macro_rules! log_error {
    ($target:expr, $($arg:tt)*) => ({
        let msg = format!($($arg)*);
        $crate::logging::log_to_file("ERROR", $target, &msg);
        tracing::error!(target: $target, "{}", msg);
    });
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,writeflow_lib=info,writeflow=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    log_to_file("INFO", "writeflow", "Application started");
}
