// Tue Oct 13 2026 - Alex

use crate::error::ErrorKind;
use crate::memory::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Read of {len} bytes failed at {addr}")]
    ReadFailed { addr: Address, len: usize },
    #[error("Write of {len} bytes failed at {addr}")]
    WriteFailed { addr: Address, len: usize },
    #[error("Region query failed at {0}")]
    QueryFailed(Address),
    #[error("Protection change failed at {0}")]
    ProtectFailed(Address),
    #[error("Address {0} is not mapped")]
    Unmapped(Address),
    #[error("Process not found: {0}")]
    ProcessNotFound(String),
    #[error("Invalid memory range {start}..{end}")]
    InvalidRange { start: Address, end: Address },
    #[error("Cannot interpret {actual} bytes as {type_name} ({expected} bytes)")]
    UnsupportedType {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl MemoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. } => ErrorKind::Argument,
            Self::ProcessNotFound(_) => ErrorKind::NotFound,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            _ => ErrorKind::MemoryAccess,
        }
    }
}
