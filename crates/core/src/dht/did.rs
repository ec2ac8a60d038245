#![warn(missing_docs)]

//! Identifier space of chordfs.
//!
//! Nodes and files share one cyclic ring of `R = 2^20` identifiers. A node is placed
//! by hashing its network address, a file by hashing its filename, with the same
//! function: the first 8 bytes of the SHA-1 digest read as a big-endian `u64`, reduced
//! modulo `R`.
//!
//! Ring intervals are written `(p, f]`: open at the lower bound, closed at the upper
//! bound, wrapping past zero when `p > f`. The degenerate interval `(p, p]` is empty,
//! so a pair of equal neighbours never claims a key.

use std::ops::Add;
use std::str::FromStr;

use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use sha1::Digest;
use sha1::Sha1;

use crate::consts::RING_SIZE;
use crate::error::Error;
use crate::error::Result;

/// Did is a finite ring R(P) where P = 2^20, wrap u64.
/// Deserializing rejects values outside of the ring instead of reducing them.
#[derive(Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Debug, Serialize, Hash, Default)]
#[serde(into = "u64")]
pub struct Did(u64);

/// Which case of the circular-interval test matched a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RangeHit {
    /// The key is not in the interval.
    Outside,
    /// `p < k <= f`, the interval does not wrap.
    Inside,
    /// `p > f` and the key sits either above `p` or at most `f`.
    InsideWrapping,
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Did {
    /// Hash arbitrary bytes, an address or a filename, onto the ring.
    pub fn hash<T: AsRef<[u8]>>(data: T) -> Self {
        let digest = Sha1::digest(data.as_ref());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix) % RING_SIZE)
    }

    /// Identifier `id`, which must already lie in `[0, R)`.
    pub fn checked(id: u64) -> Result<Self> {
        if id >= RING_SIZE {
            return Err(Error::InvalidDid(format!(
                "{id} is outside of [0, {RING_SIZE})"
            )));
        }
        Ok(Did(id))
    }

    /// Numeric value of the identifier.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Start of the `index`-th finger interval, `self + 2^index mod R`.
    pub fn finger_start(&self, index: usize) -> Self {
        *self + Did::from(1u64 << index)
    }

    /// Classify `self` against the circular interval `(p, f]`.
    pub fn classify(&self, p: Did, f: Did) -> RangeHit {
        let k = *self;
        if p < k && k <= f {
            RangeHit::Inside
        } else if p > f && (k > p || k <= f) {
            RangeHit::InsideWrapping
        } else {
            RangeHit::Outside
        }
    }

    /// Test if `self` is in the circular interval `(p, f]`.
    pub fn in_range(&self, p: Did, f: Did) -> bool {
        self.classify(p, f) != RangeHit::Outside
    }
}

impl From<u64> for Did {
    fn from(id: u64) -> Did {
        Did(id % RING_SIZE)
    }
}

impl From<u32> for Did {
    fn from(id: u32) -> Did {
        Did::from(id as u64)
    }
}

impl From<Did> for u64 {
    fn from(did: Did) -> u64 {
        did.0
    }
}

impl FromStr for Did {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::InvalidDid(format!("{s}: {e}")))?;
        Did::checked(id)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where D: Deserializer<'de> {
        let id = u64::deserialize(deserializer)?;
        Did::checked(id).map_err(de::Error::custom)
    }
}

impl Add for Did {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Did((self.0 + rhs.0) % RING_SIZE)
    }
}
