// Tue Oct 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const NULL: Address = Address { value: 0 };

    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self { value: ptr as usize as u64 }
    }

    pub const fn as_u64(self) -> u64 {
        self.value
    }

    pub const fn is_null(self) -> bool {
        self.value == 0
    }

    pub fn checked_add(self, rhs: u64) -> Option<Self> {
        self.value.checked_add(rhs).map(Self::new)
    }

    /// Distance from `base` up to this address, `None` when `base` lies above it.
    pub fn offset_from(self, base: Address) -> Option<u64> {
        self.value.checked_sub(base.value)
    }

    pub fn align_down(self, alignment: u64) -> Self {
        Self { value: self.value & !(alignment - 1) }
    }

    pub fn align_up(self, alignment: u64) -> Option<Self> {
        self.value
            .checked_add(alignment - 1)
            .map(|v| Self { value: v & !(alignment - 1) })
    }

    pub fn fits_in(self, width: PointerWidth) -> bool {
        match width {
            PointerWidth::Bits32 => self.value <= u32::MAX as u64,
            PointerWidth::Bits64 => true,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl Add<usize> for Address {
    type Output = Self;
    fn add(self, rhs: usize) -> Self::Output {
        Self { value: self.value + rhs as u64 }
    }
}

impl Sub<u64> for Address {
    type Output = Self;
    fn sub(self, rhs: u64) -> Self::Output {
        Self { value: self.value - rhs }
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self::new(value as u64)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}

/// Pointer width of the target process, which decides stub encoding and the
/// default user-mode address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub const fn native() -> Self {
        #[cfg(target_pointer_width = "64")]
        {
            Self::Bits64
        }
        #[cfg(not(target_pointer_width = "64"))]
        {
            Self::Bits32
        }
    }

    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits32 => write!(f, "32-bit"),
            Self::Bits64 => write!(f, "64-bit"),
        }
    }
}
