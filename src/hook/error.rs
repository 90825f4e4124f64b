// Thu Oct 15 2026 - Alex

use crate::error::ErrorKind;
use crate::memory::{Address, MemoryError, PointerWidth};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Hook base address is null")]
    NullBase,
    #[error("Hook target address is null")]
    NullTarget,
    #[error("Hook target {target} does not fit a {width} stub")]
    TargetOutOfRange { target: Address, width: PointerWidth },
    #[error("Hook at {0} was already removed")]
    AlreadyRemoved(Address),
    #[error("Symbol {module}::{name} not found")]
    SymbolNotFound { module: String, name: String },
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

impl HookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullBase | Self::NullTarget | Self::TargetOutOfRange { .. } | Self::AlreadyRemoved(_) => {
                ErrorKind::Argument
            }
            Self::SymbolNotFound { .. } => ErrorKind::NotFound,
            Self::Memory(e) => e.kind(),
        }
    }
}
