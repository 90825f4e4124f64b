// Thu Oct 15 2026 - Alex

use crate::events::{EventSink, LogSink};
use crate::hook::{Hook, HookError, HookSpec, SymbolQuery, SymbolResolver};
use crate::memory::{Address, TargetProcess};
use crate::utils::logging::ScopedTimer;
use ahash::AHashMap;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

impl HookId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns installed hooks in insertion order, with an optional name for each.
/// Reusing a name rebinds it to the newer hook.
pub struct HookRegistry {
    process: Arc<dyn TargetProcess>,
    sink: Arc<dyn EventSink>,
    hooks: IndexMap<HookId, Hook>,
    names: AHashMap<String, HookId>,
    next_id: u64,
}

impl HookRegistry {
    pub fn new(process: Arc<dyn TargetProcess>) -> Self {
        Self {
            process,
            sink: Arc::new(LogSink),
            hooks: IndexMap::new(),
            names: AHashMap::new(),
            next_id: 1,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn process(&self) -> &Arc<dyn TargetProcess> {
        &self.process
    }

    /// Installs a hook and registers it. Nothing is registered on failure.
    pub fn create_hook(&mut self, spec: HookSpec, name: Option<&str>) -> Result<HookId, HookError> {
        let hook = Hook::install(self.process.as_ref(), &spec, self.sink.as_ref())?;

        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.insert(id, hook);

        if let Some(name) = name {
            if let Some(previous) = self.names.insert(name.to_string(), id) {
                log::debug!("Hook name '{}' moved from {} to {}", name, previous, id);
            }
        }
        Ok(id)
    }

    pub fn create_hook_from_symbols(
        &mut self,
        resolver: &dyn SymbolResolver,
        base: &SymbolQuery,
        target: &SymbolQuery,
        name: Option<&str>,
    ) -> Result<HookId, HookError> {
        let spec = HookSpec::from_symbols(resolver, base, target)?;
        self.create_hook(spec, name)
    }

    /// Restores the original bytes and forgets the hook. Unknown ids are
    /// ignored; a hook whose removal fails stays registered.
    pub fn remove_hook(&mut self, id: HookId) -> Result<(), HookError> {
        let hook = match self.hooks.get_mut(&id) {
            Some(hook) => hook,
            None => return Ok(()),
        };
        hook.remove(self.process.as_ref(), self.sink.as_ref())?;

        self.hooks.shift_remove(&id);
        self.names.retain(|_, bound| *bound != id);
        Ok(())
    }

    /// `Ok(false)` when no hook carries `name`.
    pub fn remove_hook_by_name(&mut self, name: &str) -> Result<bool, HookError> {
        match self.names.get(name).copied() {
            Some(id) => {
                self.remove_hook(id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get_hook_by_name(&self, name: &str) -> Option<&Hook> {
        self.names.get(name).and_then(|id| self.hooks.get(id))
    }

    pub fn id_by_name(&self, name: &str) -> Option<HookId> {
        self.names.get(name).copied()
    }

    pub fn hook(&self, id: HookId) -> Option<&Hook> {
        self.hooks.get(&id)
    }

    pub fn hooks(&self) -> impl Iterator<Item = (HookId, &Hook)> {
        self.hooks.iter().map(|(&id, hook)| (id, hook))
    }

    pub fn has_hook(&self, base: Address) -> bool {
        self.hooks.values().any(|hook| hook.is_active() && hook.base() == base)
    }

    pub fn hooks_for_group(&self, group: &str) -> Vec<&Hook> {
        self.hooks
            .values()
            .filter(|hook| hook.group() == Some(group))
            .collect()
    }

    pub fn enabled_hooks(&self) -> usize {
        self.hooks.values().filter(|hook| hook.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Attempts every removal. Failed hooks stay registered and the first
    /// failure is returned.
    pub fn remove_all_hooks(&mut self) -> Result<(), HookError> {
        let _timer = ScopedTimer::new("remove all hooks");
        let ids: Vec<HookId> = self.hooks.keys().copied().collect();

        let mut first_error = None;
        for id in ids {
            if let Err(e) = self.remove_hook(id) {
                log::warn!("Failed to remove hook {}: {}", id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingSink;
    use crate::hook::{SymbolKind, SymbolTable};
    use crate::memory::{MemoryImage, Protection};

    const CODE: [u8; 32] = [0xCC; 32];

    fn setup() -> (Arc<MemoryImage>, HookRegistry) {
        let image = Arc::new(MemoryImage::new(7));
        for base in [0x10000u64, 0x11000, 0x12000] {
            image.map(Address::new(base), CODE.to_vec(), Protection::READ_EXECUTE).unwrap();
        }
        let registry = HookRegistry::new(image.clone());
        (image, registry)
    }

    #[test]
    fn test_create_and_lookup() {
        let (_image, mut registry) = setup();
        let a = registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64), Some("alpha")).unwrap();
        let b = registry.create_hook(HookSpec::new(0x11000u64, 0x9100u64), None).unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.enabled_hooks(), 2);
        assert!(registry.has_hook(Address::new(0x10000)));
        assert!(registry.has_hook(Address::new(0x11000)));
        assert!(!registry.has_hook(Address::new(0x12000)));

        assert_eq!(registry.get_hook_by_name("alpha").unwrap().base(), Address::new(0x10000));
        assert_eq!(registry.id_by_name("alpha"), Some(a));
        assert!(registry.get_hook_by_name("beta").is_none());
        assert_eq!(registry.hook(b).unwrap().target(), Address::new(0x9100));

        let order: Vec<HookId> = registry.hooks().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_failed_creation_leaves_registry_unchanged() {
        let (_image, mut registry) = setup();
        registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64), Some("alpha")).unwrap();

        assert!(registry.create_hook(HookSpec::new(0u64, 0x9000u64), Some("alpha")).is_err());
        assert!(registry.create_hook(HookSpec::new(0x50000u64, 0x9000u64), Some("ghost")).is_err());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_hook_by_name("alpha").unwrap().base(), Address::new(0x10000));
        assert!(registry.get_hook_by_name("ghost").is_none());
    }

    #[test]
    fn test_remove_restores_and_forgets() {
        let (image, mut registry) = setup();
        let id = registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64), Some("alpha")).unwrap();
        assert_ne!(image.peek(Address::new(0x10000), 32).unwrap(), CODE.to_vec());

        registry.remove_hook(id).unwrap();
        assert_eq!(image.peek(Address::new(0x10000), 32).unwrap(), CODE.to_vec());
        assert!(registry.is_empty());
        assert!(registry.get_hook_by_name("alpha").is_none());
        assert!(!registry.has_hook(Address::new(0x10000)));

        // Unknown ids are a no-op.
        registry.remove_hook(id).unwrap();
    }

    #[test]
    fn test_remove_by_name() {
        let (image, mut registry) = setup();
        registry.create_hook(HookSpec::new(0x11000u64, 0x9000u64), Some("beta")).unwrap();

        assert_eq!(registry.remove_hook_by_name("missing").unwrap(), false);
        assert_eq!(registry.remove_hook_by_name("beta").unwrap(), true);
        assert_eq!(registry.remove_hook_by_name("beta").unwrap(), false);
        assert_eq!(image.peek(Address::new(0x11000), 32).unwrap(), CODE.to_vec());
    }

    #[test]
    fn test_name_reuse_rebinds() {
        let (_image, mut registry) = setup();
        let first = registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64), Some("shared")).unwrap();
        let second = registry.create_hook(HookSpec::new(0x11000u64, 0x9000u64), Some("shared")).unwrap();

        assert_eq!(registry.id_by_name("shared"), Some(second));
        registry.remove_hook(first).unwrap();
        assert_eq!(registry.id_by_name("shared"), Some(second));

        assert!(registry.remove_hook_by_name("shared").unwrap());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_groups() {
        let (_image, mut registry) = setup();
        registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64).in_group("engine"), None).unwrap();
        registry.create_hook(HookSpec::new(0x11000u64, 0x9000u64).in_group("render"), None).unwrap();
        registry.create_hook(HookSpec::new(0x12000u64, 0x9000u64).in_group("engine"), None).unwrap();

        let bases: Vec<Address> = registry.hooks_for_group("engine").iter().map(|h| h.base()).collect();
        assert_eq!(bases, vec![Address::new(0x10000), Address::new(0x12000)]);
        assert_eq!(registry.hooks_for_group("render").len(), 1);
        assert!(registry.hooks_for_group("audio").is_empty());
    }

    #[test]
    fn test_remove_all() {
        let (image, mut registry) = setup();
        let sink = Arc::new(CollectingSink::new());
        registry = registry.with_sink(sink.clone());

        registry.remove_all_hooks().unwrap();

        for (i, base) in [0x10000u64, 0x11000, 0x12000].into_iter().enumerate() {
            let name = format!("hook{}", i);
            registry.create_hook(HookSpec::new(base, 0x9000u64), Some(&name)).unwrap();
        }
        assert_eq!(registry.enabled_hooks(), 3);

        registry.remove_all_hooks().unwrap();
        assert!(registry.is_empty());
        assert!(registry.get_hook_by_name("hook0").is_none());
        for base in [0x10000u64, 0x11000, 0x12000] {
            assert_eq!(image.peek(Address::new(base), 32).unwrap(), CODE.to_vec());
        }
        assert_eq!(sink.count("hook-installed"), 3);
        assert_eq!(sink.count("hook-removed"), 3);
    }

    #[test]
    fn test_remove_all_keeps_failures() {
        let (image, mut registry) = setup();
        registry.create_hook(HookSpec::new(0x10000u64, 0x9000u64), Some("a")).unwrap();
        let stuck = registry.create_hook(HookSpec::new(0x11000u64, 0x9000u64), Some("b")).unwrap();
        registry.create_hook(HookSpec::new(0x12000u64, 0x9000u64), Some("c")).unwrap();

        assert!(image.unmap(Address::new(0x11000)));
        assert!(registry.remove_all_hooks().is_err());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.enabled_hooks(), 1);
        assert!(registry.hook(stuck).unwrap().is_active());
        assert_eq!(registry.id_by_name("b"), Some(stuck));
        assert!(registry.get_hook_by_name("a").is_none());
    }

    #[test]
    fn test_create_from_symbols() {
        let (_image, mut registry) = setup();
        let mut table = SymbolTable::new();
        table.insert("engine", "update", Address::new(0x12000), SymbolKind::Function);
        table.insert("mods", "update_hook", Address::new(0x9000), SymbolKind::Function);

        let id = registry
            .create_hook_from_symbols(
                &table,
                &SymbolQuery::function("engine", "update"),
                &SymbolQuery::function("mods", "update_hook"),
                Some("update"),
            )
            .unwrap();

        let hook = registry.hook(id).unwrap();
        assert_eq!(hook.base(), Address::new(0x12000));
        assert_eq!(hook.group(), Some("engine"));

        let missing = registry.create_hook_from_symbols(
            &table,
            &SymbolQuery::function("engine", "draw"),
            &SymbolQuery::function("mods", "update_hook"),
            None,
        );
        assert!(matches!(missing, Err(HookError::SymbolNotFound { .. })));
        assert_eq!(registry.len(), 1);
    }
}
