// Tue Oct 13 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Protection: u32 {
        const READ = 0x01;
        const WRITE = 0x02;
        const EXECUTE = 0x04;
        const COPY_ON_WRITE = 0x08;
        const GUARD = 0x10;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        const READ_EXECUTE = Self::READ.bits() | Self::EXECUTE.bits();
        const READ_WRITE_EXECUTE = Self::READ.bits() | Self::WRITE.bits() | Self::EXECUTE.bits();
    }
}

const PAGE_NOACCESS: u32 = 0x01;
const PAGE_READONLY: u32 = 0x02;
const PAGE_READWRITE: u32 = 0x04;
const PAGE_WRITECOPY: u32 = 0x08;
const PAGE_EXECUTE: u32 = 0x10;
const PAGE_EXECUTE_READ: u32 = 0x20;
const PAGE_EXECUTE_READWRITE: u32 = 0x40;
const PAGE_EXECUTE_WRITECOPY: u32 = 0x80;
const PAGE_GUARD: u32 = 0x100;

impl Protection {
    /// Decodes POSIX `PROT_*` bits.
    pub fn from_posix(flags: u32) -> Self {
        Self::from_bits_truncate(flags & 0x7)
    }

    pub fn to_posix(self) -> u32 {
        (self & Self::READ_WRITE_EXECUTE).bits()
    }

    /// Decodes a Windows `PAGE_*` protection value.
    pub fn from_windows(raw: u32) -> Self {
        let base = match raw & 0xFF {
            PAGE_READONLY => Self::READ,
            PAGE_READWRITE => Self::READ_WRITE,
            PAGE_WRITECOPY => Self::READ_WRITE | Self::COPY_ON_WRITE,
            PAGE_EXECUTE => Self::EXECUTE,
            PAGE_EXECUTE_READ => Self::READ_EXECUTE,
            PAGE_EXECUTE_READWRITE => Self::READ_WRITE_EXECUTE,
            PAGE_EXECUTE_WRITECOPY => Self::READ_WRITE_EXECUTE | Self::COPY_ON_WRITE,
            _ => Self::empty(),
        };
        if raw & PAGE_GUARD != 0 {
            base | Self::GUARD
        } else {
            base
        }
    }

    pub fn to_windows(self) -> u32 {
        let write = self.contains(Self::WRITE);
        let cow = self.contains(Self::COPY_ON_WRITE);
        let base = if self.contains(Self::EXECUTE) {
            match (write, cow) {
                (true, true) => PAGE_EXECUTE_WRITECOPY,
                (true, false) => PAGE_EXECUTE_READWRITE,
                _ if self.contains(Self::READ) => PAGE_EXECUTE_READ,
                _ => PAGE_EXECUTE,
            }
        } else if write {
            if cow {
                PAGE_WRITECOPY
            } else {
                PAGE_READWRITE
            }
        } else if self.contains(Self::READ) {
            PAGE_READONLY
        } else {
            PAGE_NOACCESS
        };
        if self.contains(Self::GUARD) {
            base | PAGE_GUARD
        } else {
            base
        }
    }

    // Guard pages never count as accessible.
    pub fn can_read(self) -> bool {
        self.contains(Self::READ) && !self.contains(Self::GUARD)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE) && !self.contains(Self::GUARD)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE) && !self.contains(Self::GUARD)
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.contains(Self::READ), 'r'),
            flag(self.contains(Self::WRITE), 'w'),
            flag(self.contains(Self::EXECUTE), 'x'),
        )?;
        if self.contains(Self::GUARD) {
            write!(f, "g")?;
        }
        Ok(())
    }
}
