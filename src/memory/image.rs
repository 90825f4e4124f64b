// Wed Oct 14 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryProtector, MemoryReader, MemoryRegion, MemoryWriter, PointerWidth,
    Protection, RegionQuery, TargetProcess,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

struct Segment {
    size: u64,
    data: Vec<u8>,
    committed: bool,
    protection: Protection,
}

impl Segment {
    fn region(&self, base: u64) -> MemoryRegion {
        if self.committed {
            MemoryRegion::new(Address::new(base), self.size, self.protection)
        } else {
            MemoryRegion::reserved(Address::new(base), self.size)
        }
    }
}

/// An in-memory process image. Segments carry their own protection, which is
/// enforced on reads and writes the way the OS would, so it stands in for a
/// live process when scanning captured memory or exercising hooks offline.
///
/// Protection changes apply to the whole segment containing the target range.
pub struct MemoryImage {
    pid: u32,
    name: Option<String>,
    width: PointerWidth,
    segments: RwLock<BTreeMap<u64, Segment>>,
}

impl MemoryImage {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            name: None,
            width: PointerWidth::native(),
            segments: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_pointer_width(mut self, width: PointerWidth) -> Self {
        self.width = width;
        self
    }

    /// Maps committed memory at `base` holding `data`.
    pub fn map(&self, base: Address, data: Vec<u8>, protection: Protection) -> Result<(), MemoryError> {
        let size = data.len() as u64;
        self.insert(
            base,
            Segment {
                size,
                data,
                committed: true,
                protection,
            },
        )
    }

    /// Reserves address space without committing it.
    pub fn reserve(&self, base: Address, size: u64) -> Result<(), MemoryError> {
        self.insert(
            base,
            Segment {
                size,
                data: Vec::new(),
                committed: false,
                protection: Protection::empty(),
            },
        )
    }

    pub fn unmap(&self, base: Address) -> bool {
        self.segments.write().remove(&base.as_u64()).is_some()
    }

    /// Reads bytes regardless of protection, for inspection.
    pub fn peek(&self, addr: Address, len: usize) -> Option<Vec<u8>> {
        let segments = self.segments.read();
        let (base, segment) = Self::locate(&segments, addr, len)?;
        let start = (addr.as_u64() - base) as usize;
        segment.data.get(start..start + len).map(<[u8]>::to_vec)
    }

    pub fn region_count(&self) -> usize {
        self.segments.read().len()
    }

    fn insert(&self, base: Address, segment: Segment) -> Result<(), MemoryError> {
        let end = base
            .checked_add(segment.size)
            .filter(|_| segment.size > 0)
            .ok_or(MemoryError::InvalidRange {
                start: base,
                end: base,
            })?;

        let mut segments = self.segments.write();
        let below = segments
            .range(..=base.as_u64())
            .next_back()
            .map(|(&b, s)| b + s.size > base.as_u64());
        let above = segments
            .range((Bound::Excluded(base.as_u64()), Bound::Unbounded))
            .next()
            .map(|(&b, _)| b < end.as_u64());
        if below == Some(true) || above == Some(true) {
            return Err(MemoryError::InvalidRange { start: base, end });
        }

        segments.insert(base.as_u64(), segment);
        Ok(())
    }

    // Segment wholly containing [addr, addr + len).
    fn locate(segments: &BTreeMap<u64, Segment>, addr: Address, len: usize) -> Option<(u64, &Segment)> {
        let (&base, segment) = segments.range(..=addr.as_u64()).next_back()?;
        let offset = addr.as_u64() - base;
        let end = offset.checked_add(len as u64)?;
        if end <= segment.size {
            Some((base, segment))
        } else {
            None
        }
    }
}

impl MemoryReader for MemoryImage {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let segments = self.segments.read();
        match Self::locate(&segments, addr, len) {
            Some((base, segment)) if segment.committed && segment.protection.can_read() => {
                let start = (addr.as_u64() - base) as usize;
                Ok(segment.data[start..start + len].to_vec())
            }
            _ => Err(MemoryError::ReadFailed { addr, len }),
        }
    }
}

impl MemoryWriter for MemoryImage {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut segments = self.segments.write();
        let writable = matches!(
            Self::locate(&segments, addr, data.len()),
            Some((_, segment)) if segment.committed && segment.protection.can_write()
        );
        if !writable {
            return Err(MemoryError::WriteFailed {
                addr,
                len: data.len(),
            });
        }

        if let Some((&base, segment)) = segments.range_mut(..=addr.as_u64()).next_back() {
            let start = (addr.as_u64() - base) as usize;
            segment.data[start..start + data.len()].copy_from_slice(data);
        }
        Ok(())
    }
}

impl RegionQuery for MemoryImage {
    fn query_region(&self, addr: Address) -> Result<Option<MemoryRegion>, MemoryError> {
        let segments = self.segments.read();
        if let Some((&base, segment)) = segments.range(..=addr.as_u64()).next_back() {
            if addr.as_u64() - base < segment.size {
                return Ok(Some(segment.region(base)));
            }
        }

        let next = segments
            .range((Bound::Excluded(addr.as_u64()), Bound::Unbounded))
            .next()
            .map(|(&base, _)| base);
        Ok(next.map(|base| MemoryRegion::free(addr, base - addr.as_u64())))
    }
}

impl MemoryProtector for MemoryImage {
    fn protect(&self, addr: Address, len: usize, protection: Protection) -> Result<Protection, MemoryError> {
        let mut segments = self.segments.write();
        let committed = matches!(
            Self::locate(&segments, addr, len),
            Some((_, segment)) if segment.committed
        );
        if !committed {
            return Err(MemoryError::ProtectFailed(addr));
        }

        match segments.range_mut(..=addr.as_u64()).next_back() {
            Some((_, segment)) => Ok(std::mem::replace(&mut segment.protection, protection)),
            None => Err(MemoryError::ProtectFailed(addr)),
        }
    }
}

impl TargetProcess for MemoryImage {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn pointer_width(&self) -> PointerWidth {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_map_rejected() {
        let image = MemoryImage::new(1);
        image.map(Address::new(0x1000), vec![0; 0x100], Protection::READ).unwrap();
        assert!(image.map(Address::new(0x1080), vec![0; 0x10], Protection::READ).is_err());
        assert!(image.map(Address::new(0x0F80), vec![0; 0x100], Protection::READ).is_err());
        assert!(image.map(Address::new(0x1100), vec![0; 0x10], Protection::READ).is_ok());
        assert!(image.map(Address::new(0x2000), Vec::new(), Protection::READ).is_err());
    }

    #[test]
    fn test_protection_enforced() {
        let image = MemoryImage::new(1);
        image.map(Address::new(0x1000), vec![0xCC; 0x10], Protection::READ_EXECUTE).unwrap();
        image.map(Address::new(0x2000), vec![0; 0x10], Protection::empty()).unwrap();

        assert!(image.write_bytes(Address::new(0x1000), &[0x90]).is_err());
        assert!(image.read_bytes(Address::new(0x2000), 4).is_err());
        assert!(image.read_bytes(Address::new(0x100C), 8).is_err());

        let previous = image
            .protect(Address::new(0x1000), 1, Protection::READ_WRITE_EXECUTE)
            .unwrap();
        assert_eq!(previous, Protection::READ_EXECUTE);
        image.write_bytes(Address::new(0x1000), &[0x90]).unwrap();
        assert_eq!(image.read_bytes(Address::new(0x1000), 2).unwrap(), vec![0x90, 0xCC]);
    }

    #[test]
    fn test_query_reports_gaps_and_end() {
        let image = MemoryImage::new(1);
        image.map(Address::new(0x1000), vec![0; 0x1000], Protection::READ).unwrap();
        image.reserve(Address::new(0x4000), 0x1000).unwrap();

        let inside = image.query_region(Address::new(0x1800)).unwrap().unwrap();
        assert_eq!(inside.base(), Address::new(0x1000));
        assert!(inside.is_committed());

        let gap = image.query_region(Address::new(0x2000)).unwrap().unwrap();
        assert_eq!(gap.base(), Address::new(0x2000));
        assert_eq!(gap.size(), 0x2000);
        assert!(!gap.is_committed());

        let reserved = image.query_region(Address::new(0x4000)).unwrap().unwrap();
        assert!(!reserved.is_committed());

        assert!(image.query_region(Address::new(0x5000)).unwrap().is_none());
    }
}
