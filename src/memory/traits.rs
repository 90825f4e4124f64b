// Tue Oct 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRegion, PointerWidth, Protection};

pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;
}

pub trait MemoryWriter: Send + Sync {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError>;
}

pub trait RegionQuery: Send + Sync {
    /// Describes the region containing `addr`, or the free gap starting at it.
    /// `Ok(None)` marks the end of the address space.
    fn query_region(&self, addr: Address) -> Result<Option<MemoryRegion>, MemoryError>;
}

pub trait MemoryProtector: Send + Sync {
    /// Applies `protection` to `[addr, addr + len)` and returns the protection
    /// that was in effect before.
    fn protect(&self, addr: Address, len: usize, protection: Protection) -> Result<Protection, MemoryError>;
}

/// An already-open target process. Implementations own the underlying handle.
pub trait TargetProcess: MemoryReader + MemoryWriter + RegionQuery + MemoryProtector {
    fn pid(&self) -> u32;

    fn name(&self) -> Option<&str> {
        None
    }

    fn pointer_width(&self) -> PointerWidth {
        PointerWidth::native()
    }
}
