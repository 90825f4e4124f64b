// Thu Oct 15 2026 - Alex

use crate::hook::HookError;
use crate::memory::Address;
use ahash::AHashMap;
use std::fmt;

/// Where to hook and where to send control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSpec {
    pub base: Address,
    pub target: Address,
    /// Logical owner of `base`, usually its declaring module.
    pub group: Option<String>,
}

impl HookSpec {
    pub fn new(base: impl Into<Address>, target: impl Into<Address>) -> Self {
        Self {
            base: base.into(),
            target: target.into(),
            group: None,
        }
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Both ends taken from code pointers in the current process, e.g.
    /// `HookSpec::from_fn_ptrs(original as *const (), detour as *const ())`.
    pub fn from_fn_ptrs(base: *const (), target: *const ()) -> Self {
        Self::new(Address::from_ptr(base), Address::from_ptr(target))
    }

    /// Resolves both ends by symbol. The base query's module becomes the group.
    pub fn from_symbols(
        resolver: &dyn SymbolResolver,
        base: &SymbolQuery,
        target: &SymbolQuery,
    ) -> Result<Self, HookError> {
        let base_addr = resolve(resolver, base)?;
        let target_addr = resolve(resolver, target)?;
        Ok(Self::new(base_addr, target_addr).in_group(base.module()))
    }
}

fn resolve(resolver: &dyn SymbolResolver, query: &SymbolQuery) -> Result<Address, HookError> {
    resolver
        .resolve(query)
        .ok_or_else(|| HookError::SymbolNotFound {
            module: query.module().to_string(),
            name: query.name().to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Any,
    Function,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolQuery {
    module: String,
    name: String,
    kind: SymbolKind,
}

impl SymbolQuery {
    pub fn new(module: &str, name: &str) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            kind: SymbolKind::Any,
        }
    }

    pub fn function(module: &str, name: &str) -> Self {
        Self {
            kind: SymbolKind::Function,
            ..Self::new(module, name)
        }
    }

    pub fn method(module: &str, name: &str) -> Self {
        Self {
            kind: SymbolKind::Method,
            ..Self::new(module, name)
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }
}

impl fmt::Display for SymbolQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// Maps symbol queries to code addresses in the target.
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, query: &SymbolQuery) -> Option<Address>;
}

/// In-memory resolver keyed by (module, name).
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: AHashMap<(String, String), (Address, SymbolKind)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: &str, name: &str, addr: Address, kind: SymbolKind) {
        self.entries
            .insert((module.to_string(), name.to_string()), (addr, kind));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, query: &SymbolQuery) -> Option<Address> {
        let key = (query.module.clone(), query.name.clone());
        match self.entries.get(&key) {
            Some(&(addr, kind)) if query.kind == SymbolKind::Any || query.kind == kind => Some(addr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.insert("engine", "tick", Address::new(0x1000), SymbolKind::Function);
        table.insert("engine", "Player::jump", Address::new(0x2000), SymbolKind::Method);
        table.insert("detours", "tick_hook", Address::new(0x9000), SymbolKind::Function);
        table
    }

    #[test]
    fn test_symbol_table_respects_kind() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve(&SymbolQuery::new("engine", "tick")), Some(Address::new(0x1000)));
        assert_eq!(table.resolve(&SymbolQuery::function("engine", "tick")), Some(Address::new(0x1000)));
        assert_eq!(table.resolve(&SymbolQuery::method("engine", "tick")), None);
        assert_eq!(
            table.resolve(&SymbolQuery::method("engine", "Player::jump")),
            Some(Address::new(0x2000))
        );
        assert_eq!(table.resolve(&SymbolQuery::new("render", "tick")), None);
    }

    #[test]
    fn test_from_symbols() {
        let table = table();
        let spec = HookSpec::from_symbols(
            &table,
            &SymbolQuery::function("engine", "tick"),
            &SymbolQuery::function("detours", "tick_hook"),
        )
        .unwrap();
        assert_eq!(spec.base, Address::new(0x1000));
        assert_eq!(spec.target, Address::new(0x9000));
        assert_eq!(spec.group.as_deref(), Some("engine"));

        let err = HookSpec::from_symbols(
            &table,
            &SymbolQuery::new("engine", "missing"),
            &SymbolQuery::new("detours", "tick_hook"),
        )
        .unwrap_err();
        assert!(matches!(err, HookError::SymbolNotFound { ref name, .. } if name == "missing"));
    }

    extern "C" fn original(x: u32) -> u32 {
        x.wrapping_add(1)
    }

    extern "C" fn detour(x: u32) -> u32 {
        x.wrapping_mul(3)
    }

    #[test]
    fn test_from_fn_ptrs() {
        let spec = HookSpec::from_fn_ptrs(original as *const (), detour as *const ());
        assert_eq!(spec.base, Address::from_ptr(original as *const ()));
        assert!(!spec.base.is_null());
        assert!(!spec.target.is_null());
        assert_eq!(spec.group, None);
    }

    #[test]
    fn test_spec_from_raw_addresses() {
        let spec = HookSpec::new(0x1000u64, Address::new(0x2000)).in_group("engine");
        assert_eq!(spec.base, Address::new(0x1000));
        assert_eq!(spec.group.as_deref(), Some("engine"));
    }
}
