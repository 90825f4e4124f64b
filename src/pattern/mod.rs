// Tue Oct 13 2026 - Alex

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod scanner;

mod scalar;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod simd;

pub use error::{PatternError, ScanError};
pub use matcher::{Matcher, MatcherKind};
pub use pattern::{Pattern, MASK_EXACT, MASK_WILDCARD};
pub use scanner::{CancelToken, PatternScanner, ScanHandle, ScanOptions};
