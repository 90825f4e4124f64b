// Thu Oct 15 2026 - Alex

pub mod error;
pub mod hook;
pub mod registry;
pub mod stub;
pub mod target;

pub use error::HookError;
pub use hook::{Hook, HookState};
pub use registry::{HookId, HookRegistry};
pub use stub::{CodePatcher, StubTemplate};
pub use target::{HookSpec, SymbolKind, SymbolQuery, SymbolResolver, SymbolTable};
