// Wed Oct 14 2026 - Alex

//! Vector prefilters for the matcher. Each lane compares the masked first
//! pattern byte against the haystack; every hit is confirmed with the full
//! scalar rule before it is reported, and the tail that does not fill a lane
//! is handed to the scalar scan.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::pattern::{scalar, Pattern};

pub(crate) const AVX2_LANE: usize = 32;
pub(crate) const SSE2_LANE: usize = 16;

/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn find_all_avx2(haystack: &[u8], pattern: &Pattern, out: &mut Vec<usize>) {
    let last = match haystack.len().checked_sub(pattern.len()) {
        Some(last) => last,
        None => return,
    };

    let mask0 = pattern.mask()[0];
    let v_mask = _mm256_set1_epi8(mask0 as i8);
    let v_first = _mm256_set1_epi8((pattern.bytes()[0] & mask0) as i8);

    let mut lane = 0;
    while lane + AVX2_LANE <= haystack.len() && lane <= last {
        // SAFETY: lane + 32 <= haystack.len(), and loadu has no alignment requirement
        let chunk = _mm256_loadu_si256(haystack.as_ptr().add(lane) as *const __m256i);
        let hits = _mm256_cmpeq_epi8(_mm256_and_si256(chunk, v_mask), v_first);
        let mut bits = _mm256_movemask_epi8(hits) as u32;

        while bits != 0 {
            let offset = lane + bits.trailing_zeros() as usize;
            if offset > last {
                break;
            }
            if pattern.matches_at(haystack, offset) {
                out.push(offset);
            }
            bits &= bits - 1;
        }
        lane += AVX2_LANE;
    }

    scalar::scan_from(haystack, pattern, lane, out);
}

/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn find_all_sse2(haystack: &[u8], pattern: &Pattern, out: &mut Vec<usize>) {
    let last = match haystack.len().checked_sub(pattern.len()) {
        Some(last) => last,
        None => return,
    };

    let mask0 = pattern.mask()[0];
    let v_mask = _mm_set1_epi8(mask0 as i8);
    let v_first = _mm_set1_epi8((pattern.bytes()[0] & mask0) as i8);

    let mut lane = 0;
    while lane + SSE2_LANE <= haystack.len() && lane <= last {
        // SAFETY: lane + 16 <= haystack.len(), and loadu has no alignment requirement
        let chunk = _mm_loadu_si128(haystack.as_ptr().add(lane) as *const __m128i);
        let hits = _mm_cmpeq_epi8(_mm_and_si128(chunk, v_mask), v_first);
        let mut bits = (_mm_movemask_epi8(hits) as u32) & 0xFFFF;

        while bits != 0 {
            let offset = lane + bits.trailing_zeros() as usize;
            if offset > last {
                break;
            }
            if pattern.matches_at(haystack, offset) {
                out.push(offset);
            }
            bits &= bits - 1;
        }
        lane += SSE2_LANE;
    }

    scalar::scan_from(haystack, pattern, lane, out);
}
