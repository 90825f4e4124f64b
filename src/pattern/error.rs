// Wed Oct 14 2026 - Alex

use crate::error::ErrorKind;
use crate::memory::MemoryError;
use crate::pattern::MatcherKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty")]
    Empty,
    #[error("Invalid token `{token}` at position {position}")]
    InvalidToken { token: String, position: usize },
    #[error("Pattern has {bytes} bytes but mask has {mask}")]
    LengthMismatch { bytes: usize, mask: usize },
    #[error("Invalid mask byte 0x{value:02X} at position {position}")]
    InvalidMask { value: u8, position: usize },
    #[error("{0:?} matcher is not supported on this CPU")]
    UnsupportedMatcher(MatcherKind),
}

impl PatternError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Argument
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("Scan was cancelled")]
    Cancelled,
    #[error("Scan worker pool failed: {0}")]
    Pool(String),
    #[error("Scan worker terminated before completion")]
    WorkerLost,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Pattern(e) => e.kind(),
            Self::Memory(e) => e.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Pool(_) | Self::WorkerLost => ErrorKind::MemoryAccess,
        }
    }
}
