//! # ekklesia-lid
//!
//! LID: lexicographically sortable identifier.
//!
//! Similar to ULID but only 64 bits wide so it fits into a Postgres `bigint`
//! and has a shorter string form. The string form is two Crockford base32
//! groups joined by a dash, e.g. `1EGZX4RJR-31TPR`:
//!
//! - the first group is the creation time in milliseconds since the Unix
//!   epoch (42 bits, 9 symbols)
//! - the second group is a random number (22 bits, 5 symbols)
//!
//! Both groups are fixed width and use the same uppercase alphabet, so the
//! string form sorts exactly like the integer value.
//!
//! ```
//! use ekklesia_lid::Lid;
//!
//! let lid = Lid::from_int(6705847306369952472);
//! assert_eq!(lid.to_string(), "1EGZX4RJR-31TPR");
//! assert_eq!("1EGZX4RJR-31TPR".parse::<Lid>().unwrap(), lid);
//! ```

pub mod crockford;
mod error;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

pub use error::{FormatReason, LidError};

/// Number of low bits holding the random part.
pub const RANDOM_BITS: u32 = 22;

/// Number of high bits holding the millisecond timestamp.
pub const TIMESTAMP_BITS: u32 = 42;

const RANDOM_MASK: u64 = (1 << RANDOM_BITS) - 1;
const TIMESTAMP_WIDTH: usize = 9;
const RANDOM_WIDTH: usize = 5;

/// A 64-bit identifier ordered by creation time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lid(u64);

impl Lid {
    /// Create an identifier for the current wall-clock time.
    pub fn new() -> Result<Self, LidError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| LidError::Clock(err.to_string()))?;
        Ok(Self::generate_at(elapsed.as_millis() as u64))
    }

    /// Create an identifier for the given millisecond timestamp with a fresh
    /// random part.
    pub fn generate_at(milliseconds: u64) -> Self {
        let random = rand::thread_rng().gen_range(0..=RANDOM_MASK);
        Self::from_parts(milliseconds, random)
    }

    /// Compose an identifier from its timestamp and random parts.
    pub fn from_parts(milliseconds: u64, random: u64) -> Self {
        Lid((milliseconds << RANDOM_BITS) | (random & RANDOM_MASK))
    }

    /// Wrap a stored integer value. Every `u64` is accepted.
    pub const fn from_int(value: u64) -> Self {
        Lid(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Milliseconds since the Unix epoch.
    pub const fn milliseconds(&self) -> u64 {
        self.0 >> RANDOM_BITS
    }

    pub const fn random(&self) -> u64 {
        self.0 & RANDOM_MASK
    }

    /// Creation time in UTC.
    pub fn created_at(&self) -> DateTime<Utc> {
        // 42-bit millisecond values are always within chrono's range
        DateTime::<Utc>::from_timestamp_millis(self.milliseconds() as i64).unwrap_or_default()
    }

    /// Canonical `TIMESTAMP9-RANDOM5` string.
    pub fn canonical(&self) -> String {
        format!(
            "{}-{}",
            crockford::encode_padded(self.milliseconds(), TIMESTAMP_WIDTH),
            crockford::encode_padded(self.random(), RANDOM_WIDTH)
        )
    }

    /// Parse a LID string. Lowercase input and ambiguous letters are accepted.
    pub fn parse(input: &str) -> Result<Self, LidError> {
        let (ts_repr, rand_repr) = input
            .split_once('-')
            .ok_or_else(|| LidError::format(input, FormatReason::Separator))?;
        if rand_repr.contains('-') {
            return Err(LidError::format(input, FormatReason::Separator));
        }

        let milliseconds =
            crockford::decode(ts_repr).map_err(|reason| LidError::format(input, reason))?;
        let random =
            crockford::decode(rand_repr).map_err(|reason| LidError::format(input, reason))?;

        if milliseconds >> TIMESTAMP_BITS != 0 {
            return Err(LidError::format(input, FormatReason::TimestampOutOfRange));
        }
        if random > RANDOM_MASK {
            return Err(LidError::format(input, FormatReason::RandomOutOfRange));
        }

        Ok(Self::from_parts(milliseconds, random))
    }
}

/// Canonical form of a LID string: uppercase with ambiguous letters replaced.
pub fn normalize(input: &str) -> Result<String, LidError> {
    Lid::parse(input).map(|lid| lid.canonical())
}

impl fmt::Display for Lid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl fmt::Debug for Lid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LID({})", self.canonical())
    }
}

impl FromStr for Lid {
    type Err = LidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lid::parse(s)
    }
}

impl From<u64> for Lid {
    fn from(value: u64) -> Self {
        Lid(value)
    }
}

impl From<Lid> for u64 {
    fn from(lid: Lid) -> Self {
        lid.0
    }
}

impl PartialEq<u64> for Lid {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u64> for Lid {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        Some(self.0.cmp(other))
    }
}

impl PartialEq<str> for Lid {
    fn eq(&self, other: &str) -> bool {
        self.canonical() == other
    }
}

impl PartialEq<&str> for Lid {
    fn eq(&self, other: &&str) -> bool {
        self.canonical() == *other
    }
}

impl PartialEq<String> for Lid {
    fn eq(&self, other: &String) -> bool {
        self.canonical() == *other
    }
}

impl PartialOrd<str> for Lid {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.canonical().as_str().cmp(other))
    }
}

impl PartialOrd<&str> for Lid {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some(self.canonical().as_str().cmp(*other))
    }
}

impl PartialOrd<String> for Lid {
    fn partial_cmp(&self, other: &String) -> Option<Ordering> {
        Some(self.canonical().cmp(other))
    }
}

// Mirrored comparisons, so raw values work on either side.

impl PartialEq<Lid> for u64 {
    fn eq(&self, other: &Lid) -> bool {
        other == self
    }
}

impl PartialOrd<Lid> for u64 {
    fn partial_cmp(&self, other: &Lid) -> Option<Ordering> {
        Some(self.cmp(&other.0))
    }
}

impl PartialEq<Lid> for str {
    fn eq(&self, other: &Lid) -> bool {
        other == self
    }
}

impl PartialOrd<Lid> for str {
    fn partial_cmp(&self, other: &Lid) -> Option<Ordering> {
        Some(self.cmp(other.canonical().as_str()))
    }
}

impl PartialEq<Lid> for &str {
    fn eq(&self, other: &Lid) -> bool {
        other == *self
    }
}

impl PartialOrd<Lid> for &str {
    fn partial_cmp(&self, other: &Lid) -> Option<Ordering> {
        Some((*self).cmp(other.canonical().as_str()))
    }
}

impl PartialEq<Lid> for String {
    fn eq(&self, other: &Lid) -> bool {
        other == self
    }
}

impl PartialOrd<Lid> for String {
    fn partial_cmp(&self, other: &Lid) -> Option<Ordering> {
        Some(self.as_str().cmp(other.canonical().as_str()))
    }
}

impl Serialize for Lid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

struct LidVisitor;

impl<'de> Visitor<'de> for LidVisitor {
    type Value = Lid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a LID string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Lid, E> {
        Lid::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Lid, E> {
        Ok(Lid(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Lid, E> {
        u64::try_from(v)
            .map(Lid)
            .map_err(|_| E::custom(format!("negative LID value {v}")))
    }
}

impl<'de> Deserialize<'de> for Lid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LidVisitor)
    }
}
