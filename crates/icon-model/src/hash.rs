//! The 64-bit perceptual hash codes shared by the hash index, prefilter,
//! and slot locator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 64-bit perceptual hash, represented externally as a 16-character hex
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Hash64(pub u64);

impl Hash64 {
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub fn hamming_distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, ParseHashError> {
        if s.len() != 16 {
            return Err(ParseHashError::WrongLength(s.len()));
        }
        u64::from_str_radix(s, 16)
            .map(Hash64)
            .map_err(|_| ParseHashError::NotHex(s.to_string()))
    }
}

impl fmt::Display for Hash64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Hash64> for String {
    fn from(h: Hash64) -> Self {
        h.to_hex()
    }
}

impl TryFrom<String> for Hash64 {
    type Error = ParseHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hash64::from_hex(&value)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseHashError {
    #[error("expected a 16-character hex string, got {0} characters")]
    WrongLength(usize),
    #[error("not a valid hex string: {0:?}")]
    NotHex(String),
}

/// Which of the two hash kinds a value was derived from or is being
/// queried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashKind {
    PHash,
    DHash,
}

impl HashKind {
    pub fn method_tag(&self) -> &'static str {
        match self {
            HashKind::PHash => "hash-phash",
            HashKind::DHash => "hash-dhash",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::PHash => f.write_str("phash"),
            HashKind::DHash => f.write_str("dhash"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let h = Hash64::new(0xdead_beef_0000_1234);
        let hex = h.to_hex();
        assert_eq!(hex.len(), 16);
        assert_eq!(Hash64::from_hex(&hex).unwrap(), h);
    }

    #[test]
    fn hamming_distance_of_equal_hashes_is_zero() {
        let h = Hash64::new(0x1234_5678_9abc_def0);
        assert_eq!(h.hamming_distance(h), 0);
    }

    #[test]
    fn hamming_distance_counts_differing_bits() {
        let a = Hash64::new(0);
        let b = Hash64::new(0b1011);
        assert_eq!(a.hamming_distance(b), 3);
    }
}
