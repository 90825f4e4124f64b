// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryWriter, PointerWidth};

/// A fixed-layout value that can be decoded from and encoded to little-endian
/// process memory.
pub trait MemoryValue: Sized + Copy {
    const SIZE: usize;

    fn from_le_slice(bytes: &[u8]) -> Result<Self, MemoryError>;

    fn to_le_vec(&self) -> Vec<u8>;
}

fn unsupported<T>(actual: usize, expected: usize) -> MemoryError {
    MemoryError::UnsupportedType {
        type_name: std::any::type_name::<T>(),
        expected,
        actual,
    }
}

macro_rules! impl_memory_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl MemoryValue for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn from_le_slice(bytes: &[u8]) -> Result<Self, MemoryError> {
                    let raw: [u8; std::mem::size_of::<$t>()] = bytes
                        .try_into()
                        .map_err(|_| unsupported::<$t>(bytes.len(), Self::SIZE))?;
                    Ok(<$t>::from_le_bytes(raw))
                }

                fn to_le_vec(&self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }
            }
        )*
    };
}

impl_memory_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, usize, isize);

impl<const N: usize> MemoryValue for [u8; N] {
    const SIZE: usize = N;

    fn from_le_slice(bytes: &[u8]) -> Result<Self, MemoryError> {
        bytes
            .try_into()
            .map_err(|_| unsupported::<[u8; N]>(bytes.len(), N))
    }

    fn to_le_vec(&self) -> Vec<u8> {
        self.to_vec()
    }
}

pub trait MemoryReaderExt: MemoryReader {
    fn read_value<T: MemoryValue>(&self, addr: Address) -> Result<T, MemoryError> {
        let bytes = self.read_bytes(addr, T::SIZE)?;
        T::from_le_slice(&bytes)
    }

    fn read_pointer(&self, addr: Address, width: PointerWidth) -> Result<Address, MemoryError> {
        match width {
            PointerWidth::Bits32 => Ok(Address::new(self.read_value::<u32>(addr)? as u64)),
            PointerWidth::Bits64 => Ok(Address::new(self.read_value::<u64>(addr)?)),
        }
    }

    /// Reads `len` bytes and decodes them as a NUL-terminated UTF-8 string.
    fn read_string(&self, addr: Address, len: usize) -> Result<String, MemoryError> {
        let bytes = self.read_bytes(addr, len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

impl<R: MemoryReader + ?Sized> MemoryReaderExt for R {}

pub trait MemoryWriterExt: MemoryWriter {
    fn write_value<T: MemoryValue>(&self, addr: Address, value: T) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_vec())
    }
}

impl<W: MemoryWriter + ?Sized> MemoryWriterExt for W {}
