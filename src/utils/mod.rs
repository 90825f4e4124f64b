// Thu Oct 15 2026 - Alex

pub mod logging;

pub use logging::{init_from_env, init_logger, init_logger_with_file, level_from_str, FileLogger, ScopedTimer};

/// Space-separated lowercase hex, as used in log lines.
pub fn hex_string_spaced(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}
