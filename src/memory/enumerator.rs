// Wed Oct 14 2026 - Alex

use crate::memory::{AddressRange, MemoryError, MemoryRegion, RegionFilter, RegionQuery};
use crate::utils::logging::ScopedTimer;

/// Walks an address space region by region through a [`RegionQuery`].
pub struct RegionEnumerator<'a, Q: RegionQuery + ?Sized> {
    query: &'a Q,
    range: AddressRange,
    filter: RegionFilter,
}

impl<'a, Q: RegionQuery + ?Sized> RegionEnumerator<'a, Q> {
    pub fn new(query: &'a Q) -> Self {
        Self {
            query,
            range: AddressRange::default(),
            filter: RegionFilter::any(),
        }
    }

    pub fn with_range(mut self, range: AddressRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_filter(mut self, filter: RegionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Committed regions satisfying the filter, in ascending address order.
    ///
    /// Regions are reported exactly as the query primitive describes them, so
    /// the first one may begin below the start of the range.
    pub fn enumerate(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        let _timer = ScopedTimer::new("region enumeration");
        let mut regions = Vec::new();
        let mut address = self.range.start();

        while address < self.range.end() {
            let region = match self.query.query_region(address)? {
                Some(region) => region,
                None => break,
            };
            if region.size() == 0 {
                break;
            }

            if self.filter.accepts(&region) {
                regions.push(region);
            }

            match region.end() {
                Some(next) if next > address => address = next,
                _ => break,
            }
        }

        log::debug!(
            "Enumerated {} regions in {} (filter {:?})",
            regions.len(),
            self.range,
            self.filter
        );
        Ok(regions)
    }
}
