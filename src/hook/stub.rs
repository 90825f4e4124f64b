// Thu Oct 15 2026 - Alex

use crate::hook::HookError;
use crate::memory::{Address, MemoryError, PointerWidth, Protection, TargetProcess};

/// Machine code for "load absolute address into a scratch register, jump
/// through it", with a hole for the little-endian address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubTemplate {
    width: PointerWidth,
    bytes: &'static [u8],
    address_offset: usize,
}

impl StubTemplate {
    /// `mov eax, imm32; jmp eax`
    pub const X86: StubTemplate = StubTemplate {
        width: PointerWidth::Bits32,
        bytes: &[0xB8, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xE0],
        address_offset: 1,
    };

    /// `mov r10, imm64; jmp r10`
    pub const X64: StubTemplate = StubTemplate {
        width: PointerWidth::Bits64,
        bytes: &[
            0x49, 0xBA, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x41, 0xFF, 0xE2,
        ],
        address_offset: 2,
    };

    pub fn for_width(width: PointerWidth) -> Self {
        match width {
            PointerWidth::Bits32 => Self::X86,
            PointerWidth::Bits64 => Self::X64,
        }
    }

    /// Number of bytes the stub overwrites.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn address_offset(&self) -> usize {
        self.address_offset
    }

    pub fn width(&self) -> PointerWidth {
        self.width
    }

    /// The template with `target` written into its address hole.
    pub fn encode(&self, target: Address) -> Result<Vec<u8>, HookError> {
        if !target.fits_in(self.width) {
            return Err(HookError::TargetOutOfRange {
                target,
                width: self.width,
            });
        }

        let mut stub = self.bytes.to_vec();
        let size = self.width.bytes();
        let le = target.as_u64().to_le_bytes();
        stub[self.address_offset..self.address_offset + size].copy_from_slice(&le[..size]);
        Ok(stub)
    }
}

/// Writes code bytes, lifting page protection for the duration of the write.
pub struct CodePatcher<'a> {
    process: &'a dyn TargetProcess,
}

impl<'a> CodePatcher<'a> {
    pub fn new(process: &'a dyn TargetProcess) -> Self {
        Self { process }
    }

    /// Protect RWX, write, restore the previous protection. The restore is
    /// attempted even when the write fails; the write error wins.
    pub fn patch(&self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        self.patch_inner(addr, bytes, None)
    }

    /// Like [`CodePatcher::patch`], but if the write landed and the restore
    /// failed, `original` is written back before the error is returned.
    pub fn patch_or_revert(&self, addr: Address, bytes: &[u8], original: &[u8]) -> Result<(), MemoryError> {
        self.patch_inner(addr, bytes, Some(original))
    }

    fn patch_inner(&self, addr: Address, bytes: &[u8], original: Option<&[u8]>) -> Result<(), MemoryError> {
        let previous = self.process.protect(addr, bytes.len(), Protection::READ_WRITE_EXECUTE)?;
        let written = self.process.write_bytes(addr, bytes);
        let restored = self.process.protect(addr, bytes.len(), previous);

        if let Err(e) = &restored {
            log::warn!("Failed to restore {} protection at {}: {}", previous, addr, e);
            if let (Ok(()), Some(original)) = (&written, original) {
                // Protection is still lifted at this point.
                match self.process.write_bytes(addr, original) {
                    Ok(()) => log::warn!("Reverted {} bytes at {}", original.len(), addr),
                    Err(e) => log::error!("Failed to revert patch at {}: {}", addr, e),
                }
            }
        }
        written?;
        restored?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryImage, MemoryWriter, RegionQuery};

    #[test]
    fn test_x64_layout() {
        let stub = StubTemplate::X64.encode(Address::new(0x1122_3344_5566_7788)).unwrap();
        assert_eq!(stub.len(), 13);
        assert_eq!(
            stub,
            vec![0x49, 0xBA, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x41, 0xFF, 0xE2]
        );
    }

    #[test]
    fn test_x86_layout() {
        let stub = StubTemplate::X86.encode(Address::new(0xCAFE_BABE)).unwrap();
        assert_eq!(stub, vec![0xB8, 0xBE, 0xBA, 0xFE, 0xCA, 0xFF, 0xE0]);
        assert_eq!(StubTemplate::X86.address_offset(), 1);
    }

    #[test]
    fn test_x86_rejects_wide_target() {
        let err = StubTemplate::X86.encode(Address::new(0x1_0000_0000)).unwrap_err();
        assert!(matches!(err, HookError::TargetOutOfRange { .. }));
    }

    #[test]
    fn test_for_width() {
        assert_eq!(StubTemplate::for_width(PointerWidth::Bits32).len(), 7);
        assert_eq!(StubTemplate::for_width(PointerWidth::Bits64).len(), 13);
    }

    #[test]
    fn test_patch_restores_protection() {
        let image = MemoryImage::new(1);
        image.map(Address::new(0x10000), vec![0x90; 32], Protection::READ_EXECUTE).unwrap();

        // Read-execute memory rejects plain writes.
        assert!(image.write_bytes(Address::new(0x10000), &[0xCC]).is_err());

        CodePatcher::new(&image).patch(Address::new(0x10004), &[0xCC, 0xC3]).unwrap();
        assert_eq!(image.peek(Address::new(0x10003), 4).unwrap(), vec![0x90, 0xCC, 0xC3, 0x90]);

        let region = image.query_region(Address::new(0x10000)).unwrap().unwrap();
        assert_eq!(region.protection(), Protection::READ_EXECUTE);
    }

    #[test]
    fn test_patch_unmapped_fails() {
        let image = MemoryImage::new(1);
        let err = CodePatcher::new(&image).patch(Address::new(0x10000), &[0xC3]).unwrap_err();
        assert!(matches!(err, MemoryError::ProtectFailed(_)));
    }
}
