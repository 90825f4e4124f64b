// Thu Oct 15 2026 - Alex

use crate::config::ScanConfig;
use crate::events::{Event, EventSink, LogSink};
use crate::memory::{
    Address, AddressRange, MemoryError, MemoryRegion, RegionEnumerator, RegionFilter, TargetProcess,
};
use crate::pattern::{Matcher, Pattern, ScanError};
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Per-call scan bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    pub range: AddressRange,
    pub filter: RegionFilter,
}

impl ScanOptions {
    pub fn new(range: AddressRange) -> Self {
        Self {
            range,
            filter: RegionFilter::any(),
        }
    }

    pub fn with_filter(mut self, filter: RegionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Shared cancellation flag for an in-flight scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Scans a target process for byte patterns, one pool task per region.
pub struct PatternScanner {
    process: Arc<dyn TargetProcess>,
    pool: Arc<ThreadPool>,
    matcher: Matcher,
    sink: Arc<dyn EventSink>,
    defaults: ScanOptions,
}

impl PatternScanner {
    pub fn new(process: Arc<dyn TargetProcess>) -> Result<Self, ScanError> {
        Self::build(process, num_cpus::get(), ScanOptions::default())
    }

    pub fn from_config(process: Arc<dyn TargetProcess>, config: &ScanConfig) -> Result<Self, ScanError> {
        let options = ScanOptions::new(config.range()?).with_filter(config.filter());
        Self::build(process, config.max_threads, options)
    }

    fn build(process: Arc<dyn TargetProcess>, threads: usize, defaults: ScanOptions) -> Result<Self, ScanError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("memscan-worker-{}", i))
            .build()
            .map_err(|e| ScanError::Pool(e.to_string()))?;

        Ok(Self {
            process,
            pool: Arc::new(pool),
            matcher: Matcher::detect(),
            sink: Arc::new(LogSink),
            defaults,
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn matcher(&self) -> Matcher {
        self.matcher
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn default_options(&self) -> ScanOptions {
        self.defaults
    }

    /// Regions a scan with `options` would visit.
    pub fn regions(&self, options: &ScanOptions) -> Result<Vec<MemoryRegion>, ScanError> {
        Ok(RegionEnumerator::new(self.process.as_ref())
            .with_range(options.range)
            .with_filter(options.filter)
            .enumerate()?)
    }

    /// Scans with the scanner's default options and waits for the result.
    pub fn scan(&self, pattern: &str) -> Result<Vec<Address>, ScanError> {
        self.scan_with(pattern, &self.defaults)
    }

    pub fn scan_with(&self, pattern: &str, options: &ScanOptions) -> Result<Vec<Address>, ScanError> {
        self.scan_async(pattern, options)?.join()
    }

    /// Lowest matching address, if any.
    pub fn scan_first(&self, pattern: &str) -> Result<Option<Address>, ScanError> {
        Ok(self.scan(pattern)?.into_iter().min())
    }

    /// Starts a scan on the worker pool. The pattern is compiled before this
    /// returns; enumeration and matching happen in the background.
    pub fn scan_async(&self, pattern: &str, options: &ScanOptions) -> Result<ScanHandle, ScanError> {
        let job = ScanJob {
            process: Arc::clone(&self.process),
            pattern: Pattern::compile(pattern)?,
            options: *options,
            matcher: self.matcher,
            sink: Arc::clone(&self.sink),
            cancel: CancelToken::new(),
        };
        let cancel = job.cancel.clone();
        let (tx, rx) = channel();

        // Runs on a pool thread, so the per-region fan-out stays inside this pool.
        self.pool.spawn(move || {
            let _ = tx.send(job.run());
        });

        Ok(ScanHandle {
            result_receiver: rx,
            cancel,
        })
    }
}

struct ScanJob {
    process: Arc<dyn TargetProcess>,
    pattern: Pattern,
    options: ScanOptions,
    matcher: Matcher,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl ScanJob {
    fn run(&self) -> Result<Vec<Address>, ScanError> {
        let started = Instant::now();
        self.sink.on_event(&Event::ScanStarted {
            pattern: &self.pattern,
            range: self.options.range,
        });

        let regions = match RegionEnumerator::new(self.process.as_ref())
            .with_range(self.options.range)
            .with_filter(self.options.filter)
            .enumerate()
        {
            Ok(regions) => regions,
            Err(e) => {
                self.sink.on_event(&Event::ScanFinished {
                    matches: 0,
                    elapsed: started.elapsed(),
                    cancelled: self.cancel.is_cancelled(),
                });
                return Err(e.into());
            }
        };

        let results = Mutex::new(Vec::new());
        regions.par_iter().for_each(|region| {
            if self.cancel.is_cancelled() {
                return;
            }
            let hits = self.scan_region(region);
            if hits.is_empty() || self.cancel.is_cancelled() {
                return;
            }
            results.lock().extend(hits);
        });

        let cancelled = self.cancel.is_cancelled();
        let results = results.into_inner();
        self.sink.on_event(&Event::ScanFinished {
            matches: results.len(),
            elapsed: started.elapsed(),
            cancelled,
        });

        if cancelled {
            return Err(ScanError::Cancelled);
        }
        Ok(results)
    }

    fn scan_region(&self, region: &MemoryRegion) -> Vec<Address> {
        self.sink.on_event(&Event::RegionFound { region });

        match read_region(self.process.as_ref(), region) {
            Ok(data) => self
                .matcher
                .find_all(&data, &self.pattern)
                .into_iter()
                .map(|offset| region.base() + offset)
                .collect(),
            Err(error) => {
                self.sink.on_event(&Event::RegionReadFailed {
                    region,
                    error: &error,
                });
                Vec::new()
            }
        }
    }
}

fn read_region(process: &dyn TargetProcess, region: &MemoryRegion) -> Result<Vec<u8>, MemoryError> {
    let len = usize::try_from(region.size()).map_err(|_| MemoryError::ReadFailed {
        addr: region.base(),
        len: usize::MAX,
    })?;
    process.read_bytes(region.base(), len)
}

/// Handle to a scan running on the worker pool.
pub struct ScanHandle {
    result_receiver: Receiver<Result<Vec<Address>, ScanError>>,
    cancel: CancelToken,
}

impl ScanHandle {
    /// Blocks until every dispatched region has finished, or returns
    /// [`ScanError::Cancelled`] as soon as the scan is cancelled.
    pub fn join(self) -> Result<Vec<Address>, ScanError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            match self.result_receiver.recv_timeout(JOIN_POLL_INTERVAL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(ScanError::WorkerLost),
            }
        }
    }

    pub fn try_result(&self) -> Option<Result<Vec<Address>, ScanError>> {
        self.result_receiver.try_recv().ok()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
