// Thu Oct 15 2026 - Alex

use crate::config::ConfigError;
use crate::hook::HookError;
use crate::memory::MemoryError;
use crate::pattern::{PatternError, ScanError};
use std::fmt;
use thiserror::Error;

/// Coarse classification shared by every error in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed pattern, null or out-of-range address, invalid range, misuse.
    Argument,
    /// Named process or symbol not found.
    NotFound,
    MemoryAccess,
    UnsupportedType,
    Cancelled,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Argument => "argument",
            Self::NotFound => "not found",
            Self::MemoryAccess => "memory access",
            Self::UnsupportedType => "unsupported type",
            Self::Cancelled => "cancelled",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Pattern(e) => e.kind(),
            Self::Memory(e) => e.kind(),
            Self::Scan(e) => e.kind(),
            Self::Hook(e) => e.kind(),
            Self::Config(e) => e.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
