// Tue Oct 13 2026 - Alex

use crate::pattern::{scalar, Pattern, PatternError};
use once_cell::sync::Lazy;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::pattern::simd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// 32-byte lanes.
    Avx2,
    /// 16-byte lanes.
    Sse2,
    Scalar,
}

impl MatcherKind {
    /// Highest capability first.
    pub const ALL: [MatcherKind; 3] = [MatcherKind::Avx2, MatcherKind::Sse2, MatcherKind::Scalar];

    pub fn is_supported(self) -> bool {
        match self {
            Self::Scalar => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Sse2 => is_x86_feature_detected!("sse2"),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            _ => false,
        }
    }

    pub fn lane_width(self) -> usize {
        match self {
            Self::Avx2 => 32,
            Self::Sse2 => 16,
            Self::Scalar => 1,
        }
    }
}

static DETECTED: Lazy<MatcherKind> = Lazy::new(|| {
    let kind = MatcherKind::ALL
        .into_iter()
        .find(|kind| kind.is_supported())
        .unwrap_or(MatcherKind::Scalar);
    log::debug!("Selected {:?} pattern matcher", kind);
    kind
});

/// Finds every offset in a buffer where a [`Pattern`] matches. The variant is
/// fixed at construction; all variants report identical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    kind: MatcherKind,
}

impl Matcher {
    /// The most capable variant the CPU supports.
    pub fn detect() -> Self {
        Self { kind: *DETECTED }
    }

    pub fn scalar() -> Self {
        Self {
            kind: MatcherKind::Scalar,
        }
    }

    pub fn with_kind(kind: MatcherKind) -> Result<Self, PatternError> {
        if kind.is_supported() {
            Ok(Self { kind })
        } else {
            Err(PatternError::UnsupportedMatcher(kind))
        }
    }

    pub fn available() -> Vec<MatcherKind> {
        MatcherKind::ALL
            .into_iter()
            .filter(|kind| kind.is_supported())
            .collect()
    }

    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    /// Ascending offsets of every match.
    pub fn find_all(&self, haystack: &[u8], pattern: &Pattern) -> Vec<usize> {
        let mut out = Vec::new();
        match self.kind {
            // SAFETY: construction only admits kinds the CPU supports
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            MatcherKind::Avx2 => unsafe { simd::find_all_avx2(haystack, pattern, &mut out) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            MatcherKind::Sse2 => unsafe { simd::find_all_sse2(haystack, pattern, &mut out) },
            _ => scalar::scan_from(haystack, pattern, 0, &mut out),
        }
        out
    }

    pub fn find_first(&self, haystack: &[u8], pattern: &Pattern) -> Option<usize> {
        self.find_all(haystack, pattern).into_iter().next()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn byte(&mut self, alphabet: u8) -> u8 {
            (self.next() % alphabet as u64) as u8
        }
    }

    fn pattern_from(bytes: &[u8], wildcards: &[usize]) -> Pattern {
        let mask = (0..bytes.len())
            .map(|i| if wildcards.contains(&i) { 0x00 } else { 0xFF })
            .collect();
        let bytes = bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| if wildcards.contains(&i) { 0 } else { b })
            .collect();
        Pattern::new(bytes, mask).unwrap()
    }

    fn assert_equivalent(haystack: &[u8], pattern: &Pattern) {
        let expected = Matcher::scalar().find_all(haystack, pattern);
        for kind in Matcher::available() {
            let found = Matcher::with_kind(kind).unwrap().find_all(haystack, pattern);
            assert_eq!(
                found,
                expected,
                "{:?} disagrees on len {} pattern {}",
                kind,
                haystack.len(),
                pattern
            );
        }
    }

    #[test]
    fn test_example_match() {
        let pattern = Pattern::compile("20 ??").unwrap();
        for kind in Matcher::available() {
            let matcher = Matcher::with_kind(kind).unwrap();
            assert_eq!(matcher.find_all(&[0x10, 0x20, 0x30, 0x40], &pattern), vec![1]);
        }
    }

    #[test]
    fn test_scalar_reference() {
        let pattern = Pattern::compile("AA ?? AA").unwrap();
        let haystack = [0xAA, 0x00, 0xAA, 0x01, 0xAA, 0xAA, 0xAA];
        assert_eq!(Matcher::scalar().find_all(&haystack, &pattern), vec![0, 2, 4]);
        assert_eq!(Matcher::scalar().find_first(&haystack, &pattern), Some(0));
    }

    #[test]
    fn test_boundary_lengths() {
        let pattern = Pattern::compile("AB ?? AB").unwrap();
        for len in [0usize, 1, 2, 3, 15, 16, 17, 31, 32, 33, 47, 48, 63, 64, 65] {
            let all_hits = vec![0xABu8; len];
            assert_equivalent(&all_hits, &pattern);

            let mut tail_hit = vec![0u8; len];
            if len >= 3 {
                tail_hit[len - 3] = 0xAB;
                tail_hit[len - 1] = 0xAB;
                assert_eq!(Matcher::scalar().find_all(&tail_hit, &pattern), vec![len - 3]);
            }
            assert_equivalent(&tail_hit, &pattern);
        }
    }

    #[test]
    fn test_pattern_longer_than_haystack() {
        let pattern = Pattern::from_bytes(&[0x90; 40]).unwrap();
        for kind in Matcher::available() {
            let matcher = Matcher::with_kind(kind).unwrap();
            assert!(matcher.find_all(&[0x90; 39], &pattern).is_empty());
            assert_eq!(matcher.find_all(&[0x90; 40], &pattern), vec![0]);
        }
    }

    #[test]
    fn test_leading_wildcard() {
        let pattern = Pattern::compile("?? 05").unwrap();
        let mut haystack = vec![0u8; 70];
        haystack[1] = 0x05;
        haystack[33] = 0x05;
        haystack[69] = 0x05;
        assert_eq!(Matcher::scalar().find_all(&haystack, &pattern), vec![0, 32, 68]);
        assert_equivalent(&haystack, &pattern);
    }

    #[test]
    fn test_randomized_equivalence() {
        let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
        for round in 0..400 {
            let len = (rng.next() % 200) as usize;
            // A small alphabet keeps matches frequent.
            let haystack: Vec<u8> = (0..len).map(|_| rng.byte(4)).collect();

            let pattern_len = 1 + (rng.next() % 6) as usize;
            let bytes: Vec<u8> = (0..pattern_len).map(|_| rng.byte(4)).collect();
            let wildcards: Vec<usize> = (0..pattern_len).filter(|_| rng.next() % 3 == 0).collect();
            let pattern = pattern_from(&bytes, &wildcards);

            let expected = Matcher::scalar().find_all(&haystack, &pattern);
            let brute: Vec<usize> = (0..haystack.len())
                .filter(|&o| pattern.matches_at(&haystack, o))
                .collect();
            assert_eq!(expected, brute, "round {}", round);
            assert_equivalent(&haystack, &pattern);
        }
    }

    #[test]
    fn test_detect_is_supported() {
        let matcher = Matcher::detect();
        assert!(matcher.kind().is_supported());
        assert_eq!(Matcher::detect(), matcher);
        assert!(Matcher::available().contains(&MatcherKind::Scalar));
    }
}
