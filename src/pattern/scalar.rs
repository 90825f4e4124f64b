// Wed Oct 14 2026 - Alex

use crate::pattern::Pattern;

/// Checks every offset from `start` to the last position where the pattern
/// still fits, appending matches in ascending order.
pub(crate) fn scan_from(haystack: &[u8], pattern: &Pattern, start: usize, out: &mut Vec<usize>) {
    let last = match haystack.len().checked_sub(pattern.len()) {
        Some(last) => last,
        None => return,
    };
    if start > last {
        return;
    }

    out.extend((start..=last).filter(|&offset| pattern.matches_at(haystack, offset)));
}
