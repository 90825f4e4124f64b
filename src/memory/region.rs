// Tue Oct 13 2026 - Alex

use crate::memory::{Address, Protection};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
    base: Address,
    size: u64,
    committed: bool,
    protection: Protection,
}

impl MemoryRegion {
    /// A committed region.
    pub fn new(base: Address, size: u64, protection: Protection) -> Self {
        Self {
            base,
            size,
            committed: true,
            protection,
        }
    }

    /// Reserved address space with no backing pages.
    pub fn reserved(base: Address, size: u64) -> Self {
        Self {
            base,
            size,
            committed: false,
            protection: Protection::empty(),
        }
    }

    /// An unallocated gap between two allocations.
    pub fn free(base: Address, size: u64) -> Self {
        Self::reserved(base, size)
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// First address past the region, `None` when it would wrap the address space.
    pub fn end(&self) -> Option<Address> {
        self.base.checked_add(self.size)
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn contains(&self, addr: Address) -> bool {
        match addr.offset_from(self.base) {
            Some(offset) => offset < self.size,
            None => false,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.protection.can_read()
    }

    pub fn is_writable(&self) -> bool {
        self.protection.can_write()
    }

    pub fn is_executable(&self) -> bool {
        self.protection.can_execute()
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.committed { "commit" } else { "free" };
        write!(f, "{} +0x{:x} {} {}", self.base, self.size, self.protection, state)
    }
}

/// Protection requirements for region enumeration. A flag left unset is not
/// required; a set flag must be satisfied by the region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegionFilter {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
}

impl RegionFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn readable(mut self) -> Self {
        self.readable = true;
        self
    }

    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    pub fn accepts(&self, region: &MemoryRegion) -> bool {
        region.is_committed()
            && (!self.readable || region.is_readable())
            && (!self.writable || region.is_writable())
            && (!self.executable || region.is_executable())
    }
}
