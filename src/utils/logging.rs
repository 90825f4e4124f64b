// Thu Oct 15 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Installs the coloured stderr logger. Returns `false` if a logger was
/// already installed.
pub fn init_logger(level: LevelFilter) -> bool {
    let installed = log::set_boxed_logger(Box::new(ColoredLogger::new(level))).is_ok();
    if installed {
        log::set_max_level(level);
    }
    installed
}

/// Installs a logger that appends plain lines to `path`, creating it if
/// needed. `Ok(false)` means a logger was already installed.
pub fn init_logger_with_file(level: LevelFilter, path: &Path) -> std::io::Result<bool> {
    let logger = FileLogger::open(level, path)?;
    let installed = log::set_boxed_logger(Box::new(logger)).is_ok();
    if installed {
        log::set_max_level(level);
    }
    Ok(installed)
}

/// Installs `env_logger`, configured through `RUST_LOG`.
pub fn init_from_env() -> bool {
    env_logger::try_init().is_ok()
}

pub fn level_from_str(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

struct ColoredLogger {
    level: LevelFilter,
}

impl ColoredLogger {
    fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn format_level(level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = format!("[{}]", record.target());
        eprintln!(
            "{} {} {}",
            Self::format_level(record.level()),
            target.dimmed(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Appends `<secs>.<millis> LEVEL [target] message` lines to a file.
pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(level: LevelFilter, path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {:5} [{}] {}\n",
            unix_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let _ = self.file.lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

fn unix_timestamp() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

/// Logs the lifetime of a scope at debug level.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("[TIMER] {} took {:.2}ms", self.name, self.elapsed_ms());
    }
}
