// Tue Oct 13 2026 - Alex

pub mod address;
pub mod enumerator;
pub mod error;
pub mod image;
pub mod protection;
pub mod range;
pub mod region;
pub mod traits;
pub mod value;

#[cfg(target_os = "linux")]
pub mod procfs;

pub use address::{Address, PointerWidth};
pub use enumerator::RegionEnumerator;
pub use error::MemoryError;
pub use image::MemoryImage;
pub use protection::Protection;
pub use range::AddressRange;
pub use region::{MemoryRegion, RegionFilter};
pub use traits::{MemoryProtector, MemoryReader, MemoryWriter, RegionQuery, TargetProcess};
pub use value::{MemoryReaderExt, MemoryValue, MemoryWriterExt};

#[cfg(target_os = "linux")]
pub use procfs::ProcfsProcess;
