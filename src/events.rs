// Thu Oct 15 2026 - Alex

use crate::memory::{Address, AddressRange, MemoryError, MemoryRegion};
use crate::pattern::Pattern;
use parking_lot::Mutex;
use std::time::Duration;

/// Lifecycle points reported by the scanner and the hook engine.
#[derive(Debug)]
pub enum Event<'a> {
    ScanStarted {
        pattern: &'a Pattern,
        range: AddressRange,
    },
    RegionFound {
        region: &'a MemoryRegion,
    },
    RegionReadFailed {
        region: &'a MemoryRegion,
        error: &'a MemoryError,
    },
    ScanFinished {
        matches: usize,
        elapsed: Duration,
        cancelled: bool,
    },
    HookInstalled {
        base: Address,
        target: Address,
        group: Option<&'a str>,
    },
    HookRemoved {
        base: Address,
    },
}

impl Event<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScanStarted { .. } => "scan-started",
            Self::RegionFound { .. } => "region-found",
            Self::RegionReadFailed { .. } => "region-read-failed",
            Self::ScanFinished { .. } => "scan-finished",
            Self::HookInstalled { .. } => "hook-installed",
            Self::HookRemoved { .. } => "hook-removed",
        }
    }
}

/// Receives lifecycle events. Never consulted for control flow.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &Event<'_>);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&self, _event: &Event<'_>) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&self, event: &Event<'_>) {
        match event {
            Event::ScanStarted { pattern, range } => {
                log::info!("Scanning {} for [{}]", range, pattern);
            }
            Event::RegionFound { region } => {
                log::trace!("Scanning region {}", region);
            }
            Event::RegionReadFailed { region, error } => {
                log::warn!("Skipping region {}: {}", region, error);
            }
            Event::ScanFinished {
                matches,
                elapsed,
                cancelled,
            } => {
                if *cancelled {
                    log::info!("Scan cancelled after {:.2?}", elapsed);
                } else {
                    log::info!("Scan finished with {} matches in {:.2?}", matches, elapsed);
                }
            }
            Event::HookInstalled { base, target, group } => match group {
                Some(group) => log::info!("Hooked {} -> {} ({})", base, target, group),
                None => log::info!("Hooked {} -> {}", base, target),
            },
            Event::HookRemoved { base } => {
                log::info!("Unhooked {}", base);
            }
        }
    }
}

/// Records event labels in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    labels: Mutex<Vec<&'static str>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.labels.lock().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        self.labels.lock().iter().filter(|&&l| l == label).count()
    }

    pub fn clear(&self) {
        self.labels.lock().clear();
    }
}

impl EventSink for CollectingSink {
    fn on_event(&self, event: &Event<'_>) {
        self.labels.lock().push(event.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        sink.on_event(&Event::HookRemoved {
            base: Address::new(0x1000),
        });
        sink.on_event(&Event::ScanFinished {
            matches: 3,
            elapsed: Duration::from_millis(5),
            cancelled: false,
        });
        sink.on_event(&Event::HookRemoved {
            base: Address::new(0x2000),
        });

        assert_eq!(sink.labels(), vec!["hook-removed", "scan-finished", "hook-removed"]);
        assert_eq!(sink.count("hook-removed"), 2);
        sink.clear();
        assert!(sink.labels().is_empty());
    }

    #[test]
    fn test_log_sink_accepts_every_event() {
        let pattern = Pattern::compile("90 ??").unwrap();
        let region = MemoryRegion::new(Address::new(0x1000), 0x1000, crate::memory::Protection::READ);
        let error = MemoryError::Unmapped(Address::new(0x1000));

        let events = [
            Event::ScanStarted {
                pattern: &pattern,
                range: AddressRange::default(),
            },
            Event::RegionFound { region: &region },
            Event::RegionReadFailed {
                region: &region,
                error: &error,
            },
            Event::ScanFinished {
                matches: 0,
                elapsed: Duration::ZERO,
                cancelled: true,
            },
            Event::HookInstalled {
                base: Address::new(0x1000),
                target: Address::new(0x2000),
                group: Some("engine"),
            },
        ];
        for event in &events {
            LogSink.on_event(event);
            NullSink.on_event(event);
        }
    }
}
