// Tue Oct 13 2026 - Alex

use crate::pattern::PatternError;
use std::fmt;
use std::str::FromStr;

pub const MASK_EXACT: u8 = 0xFF;
pub const MASK_WILDCARD: u8 = 0x00;

/// A byte pattern with a parallel mask: `0xFF` positions must match exactly,
/// `0x00` positions match any byte. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Vec<u8>,
    mask: Vec<u8>,
}

impl Pattern {
    pub fn new(bytes: Vec<u8>, mask: Vec<u8>) -> Result<Self, PatternError> {
        if bytes.len() != mask.len() {
            return Err(PatternError::LengthMismatch {
                bytes: bytes.len(),
                mask: mask.len(),
            });
        }
        if bytes.is_empty() {
            return Err(PatternError::Empty);
        }
        if let Some((position, &value)) = mask
            .iter()
            .enumerate()
            .find(|&(_, &m)| m != MASK_EXACT && m != MASK_WILDCARD)
        {
            return Err(PatternError::InvalidMask { value, position });
        }
        Ok(Self { bytes, mask })
    }

    /// Parses whitespace-separated tokens: two hex digits for an exact byte,
    /// `?` or `??` for a wildcard.
    ///
    /// ```
    /// use memscan_hook::pattern::Pattern;
    ///
    /// let pattern = Pattern::compile("48 8B ?? ?? 05").unwrap();
    /// assert_eq!(pattern.mask(), &[0xFF, 0xFF, 0x00, 0x00, 0xFF]);
    /// ```
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut bytes = Vec::new();
        let mut mask = Vec::new();

        for (position, token) in source.split_whitespace().enumerate() {
            match token {
                "?" | "??" => {
                    bytes.push(0);
                    mask.push(MASK_WILDCARD);
                }
                _ => {
                    bytes.push(parse_hex_byte(token).ok_or_else(|| PatternError::InvalidToken {
                        token: token.to_string(),
                        position,
                    })?);
                    mask.push(MASK_EXACT);
                }
            }
        }

        if bytes.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { bytes, mask })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatternError> {
        Self::new(bytes.to_vec(), vec![MASK_EXACT; bytes.len()])
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    pub fn wildcard_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m == MASK_WILDCARD).count()
    }

    /// Whether the pattern matches `haystack` starting at `offset`.
    #[inline]
    pub fn matches_at(&self, haystack: &[u8], offset: usize) -> bool {
        let window = match offset
            .checked_add(self.bytes.len())
            .and_then(|end| haystack.get(offset..end))
        {
            Some(window) => window,
            None => return false,
        };

        window
            .iter()
            .zip(&self.bytes)
            .zip(&self.mask)
            .all(|((&b, &p), &m)| b & m == p & m)
    }
}

fn parse_hex_byte(token: &str) -> Option<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (&b, &m)) in self.bytes.iter().zip(&self.mask).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if m == MASK_WILDCARD {
                write!(f, "??")?;
            } else {
                write!(f, "{:02X}", b)?;
            }
        }
        Ok(())
    }
}
