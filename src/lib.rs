// Thu Oct 15 2026 - Alex

pub mod config;
pub mod error;
pub mod events;
pub mod hook;
pub mod memory;
pub mod pattern;
pub mod utils;

pub use config::{Config, ScanConfig};
pub use error::{Error, ErrorKind, Result};
pub use events::{Event, EventSink, LogSink, NullSink};
pub use hook::{Hook, HookId, HookRegistry, HookSpec, SymbolQuery, SymbolResolver};
pub use memory::{Address, AddressRange, MemoryImage, MemoryRegion, Protection, RegionFilter, TargetProcess};
pub use pattern::{Matcher, MatcherKind, Pattern, PatternScanner, ScanHandle, ScanOptions};

#[cfg(target_os = "linux")]
pub use memory::ProcfsProcess;
