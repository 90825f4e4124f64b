// Tue Oct 13 2026 - Alex

use crate::memory::{Address, MemoryError, PointerWidth};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const USER_MODE_START: u64 = 0x0000_0000_0001_0000;
pub const USER_MODE_END_64: u64 = 0x0000_7FFF_FFFE_FFFF;
pub const USER_MODE_END_32: u64 = 0x7FFE_FFFF;

/// Half-open address range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRange {
    start: Address,
    end: Address,
}

impl AddressRange {
    pub fn new(start: Address, end: Address) -> Result<Self, MemoryError> {
        if end <= start {
            return Err(MemoryError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Result<Self, MemoryError> {
        let end = start.checked_add(size).ok_or(MemoryError::InvalidRange {
            start,
            end: Address::new(u64::MAX),
        })?;
        Self::new(start, end)
    }

    pub fn user_mode(width: PointerWidth) -> Self {
        let end = match width {
            PointerWidth::Bits32 => USER_MODE_END_32,
            PointerWidth::Bits64 => USER_MODE_END_64,
        };
        Self {
            start: Address::new(USER_MODE_START),
            end: Address::new(end),
        }
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }
}

impl Default for AddressRange {
    fn default() -> Self {
        Self::user_mode(PointerWidth::native())
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_range() {
        let addr = Address::new(0x1000);
        assert!(AddressRange::new(addr, addr).is_err());
        assert!(AddressRange::new(addr + 1u64, addr).is_err());
    }

    #[test]
    fn test_user_mode_bounds() {
        let range = AddressRange::user_mode(PointerWidth::Bits32);
        assert_eq!(range.start().as_u64(), 0x10000);
        assert_eq!(range.end().as_u64(), 0x7FFE_FFFF);
        assert!(range.contains(Address::new(0x400000)));
        assert!(!range.contains(Address::new(0x8000)));
    }
}
