// Thu Oct 15 2026 - Alex

use crate::events::{Event, EventSink};
use crate::hook::{CodePatcher, HookError, HookSpec, StubTemplate};
use crate::memory::{Address, TargetProcess};
use crate::utils::hex_string_spaced;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookState {
    Active,
    Removed,
}

/// A jump stub written over the start of a function, plus the bytes it
/// replaced. Only ever moves from `Active` to `Removed`.
#[derive(Debug)]
pub struct Hook {
    base: Address,
    target: Address,
    original: Vec<u8>,
    stub: Vec<u8>,
    group: Option<String>,
    state: HookState,
}

impl Hook {
    /// Snapshots the bytes at `spec.base` and overwrites them with a jump to
    /// `spec.target`. Nothing is returned unless the patch landed.
    pub fn install(process: &dyn TargetProcess, spec: &HookSpec, sink: &dyn EventSink) -> Result<Self, HookError> {
        if spec.base.is_null() {
            return Err(HookError::NullBase);
        }
        if spec.target.is_null() {
            return Err(HookError::NullTarget);
        }

        let template = StubTemplate::for_width(process.pointer_width());
        let stub = template.encode(spec.target)?;
        let original = process.read_bytes(spec.base, template.len())?;

        CodePatcher::new(process).patch_or_revert(spec.base, &stub, &original)?;
        log::debug!(
            "Patched {} [{}] -> [{}]",
            spec.base,
            hex_string_spaced(&original),
            hex_string_spaced(&stub)
        );

        sink.on_event(&Event::HookInstalled {
            base: spec.base,
            target: spec.target,
            group: spec.group.as_deref(),
        });

        Ok(Self {
            base: spec.base,
            target: spec.target,
            original,
            stub,
            group: spec.group.clone(),
            state: HookState::Active,
        })
    }

    /// Writes the original bytes back. On failure the hook stays `Active`.
    pub fn remove(&mut self, process: &dyn TargetProcess, sink: &dyn EventSink) -> Result<(), HookError> {
        if self.state == HookState::Removed {
            return Err(HookError::AlreadyRemoved(self.base));
        }

        CodePatcher::new(process).patch(self.base, &self.original)?;
        self.state = HookState::Removed;

        sink.on_event(&Event::HookRemoved { base: self.base });
        Ok(())
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn original_bytes(&self) -> &[u8] {
        &self.original
    }

    pub fn stub_bytes(&self) -> &[u8] {
        &self.stub
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == HookState::Active
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook {{ base: {}, hook: {} }}", self.base, self.target)
    }
}
