//! Snowflake ID - 64-bit time-sortable identifier
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)
//!
//! Ids are generated outside the storage layer and only ever compared,
//! stored and paginated over here. Ordering by id is ordering by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;

/// Time-sortable 64-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Assemble an id from its parts. `timestamp_ms` is Unix milliseconds.
    pub fn from_parts(timestamp_ms: i64, worker_id: u16, sequence: u16) -> Self {
        let elapsed = (timestamp_ms - Self::EPOCH).max(0);
        Self(
            (elapsed << (WORKER_BITS + SEQUENCE_BITS))
                | (i64::from(worker_id & MAX_WORKER_ID) << SEQUENCE_BITS)
                | (i64::from(sequence) & SEQUENCE_MASK),
        )
    }

    /// Smallest id that could have been generated at `at`.
    ///
    /// Useful as a pagination cursor when the caller only has a point in time.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self::from_parts(at.timestamp_millis(), 0, 0)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    #[inline]
    pub fn sequence(&self) -> u16 {
        (self.0 & SEQUENCE_MASK) as u16
    }

    /// Creation time encoded in the id; falls back to the custom epoch for
    /// values outside chrono's range.
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp())
            .or_else(|| DateTime::from_timestamp_millis(Self::EPOCH))
            .unwrap_or_default()
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Ids leave the process as decimal strings; 64-bit integers do not survive
// every JSON consumer.
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

// Accept both the string form and a bare number
impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer snowflake id")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| E::custom("snowflake out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Lock-free Snowflake generator for one worker
///
/// The last issued (timestamp, sequence) pair lives in a single atomic, so
/// concurrent callers never observe a torn state. When a millisecond's
/// sequence space runs out, or the wall clock steps backwards, generation
/// continues from the last issued timestamp instead of blocking.
pub struct SnowflakeGenerator {
    worker_id: u16,
    // (millis since EPOCH) << SEQUENCE_BITS | sequence
    last: AtomicI64,
}

impl SnowflakeGenerator {
    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id <= MAX_WORKER_ID, "Worker ID must be < 1024");
        Self {
            worker_id,
            last: AtomicI64::new(0),
        }
    }

    /// Create a generator, or `None` if the worker id does not fit in 10 bits
    pub fn try_new(worker_id: u16) -> Option<Self> {
        (worker_id <= MAX_WORKER_ID).then(|| Self {
            worker_id,
            last: AtomicI64::new(0),
        })
    }

    pub fn generate(&self) -> Snowflake {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let now = Utc::now().timestamp_millis() - Snowflake::EPOCH;
            let prev_millis = prev >> SEQUENCE_BITS;

            let next = if now > prev_millis {
                now << SEQUENCE_BITS
            } else if prev & SEQUENCE_MASK == SEQUENCE_MASK {
                (prev_millis + 1) << SEQUENCE_BITS
            } else {
                prev + 1
            };

            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let millis = next >> SEQUENCE_BITS;
                    return Snowflake::new(
                        (millis << (WORKER_BITS + SEQUENCE_BITS))
                            | (i64::from(self.worker_id) << SEQUENCE_BITS)
                            | (next & SEQUENCE_MASK),
                    );
                }
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self {
            worker_id: 0,
            last: AtomicI64::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_snowflake_zero() {
        assert!(Snowflake::default().is_zero());
        assert!(!Snowflake::new(1).is_zero());
    }

    #[test]
    fn test_snowflake_parse() {
        assert_eq!(Snowflake::parse("123456789").unwrap().into_inner(), 123_456_789);
        assert_eq!(Snowflake::parse(" 42 ").unwrap(), Snowflake::new(42));
        assert!(Snowflake::parse("invalid").is_err());
    }

    #[test]
    fn test_snowflake_serializes_as_string() {
        let sf = Snowflake::new(123_456_789_012_345_678);
        let json = serde_json::to_string(&sf).unwrap();
        assert_eq!(json, "\"123456789012345678\"");
    }

    #[test]
    fn test_snowflake_deserialize_string_or_number() {
        let from_str: Snowflake = serde_json::from_str("\"123456789012345678\"").unwrap();
        let from_num: Snowflake = serde_json::from_str("123456789012345678").unwrap();
        assert_eq!(from_str, from_num);

        assert!(serde_json::from_str::<Snowflake>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Snowflake>("18446744073709551615").is_err());
    }

    #[test]
    fn test_from_parts_round_trip() {
        let ts = Snowflake::EPOCH + 86_400_000;
        let sf = Snowflake::from_parts(ts, 7, 99);
        assert_eq!(sf.timestamp(), ts);
        assert_eq!(sf.worker_id(), 7);
        assert_eq!(sf.sequence(), 99);
    }

    #[test]
    fn test_from_datetime_is_lower_bound() {
        let generator = SnowflakeGenerator::new(3);
        let before = Utc::now();
        let id = generator.generate();
        assert!(Snowflake::from_datetime(before) <= id);
    }

    #[test]
    fn test_created_at_matches_timestamp() {
        let ts = Snowflake::EPOCH + 1_000;
        let sf = Snowflake::from_parts(ts, 0, 0);
        assert_eq!(sf.created_at().timestamp_millis(), ts);
    }

    #[test]
    fn test_generator_ids_are_unique_and_monotonic() {
        let generator = SnowflakeGenerator::new(1);
        let mut last = Snowflake::new(0);
        let mut seen = HashSet::new();

        // Enough to overflow at least one millisecond's sequence space
        for _ in 0..10_000 {
            let id = generator.generate();
            assert!(id > last, "ids must increase");
            assert!(seen.insert(id));
            last = id;
        }
    }

    #[test]
    fn test_generator_worker_id_preserved() {
        let generator = SnowflakeGenerator::new(42);
        assert_eq!(generator.generate().worker_id(), 42);
        assert_eq!(generator.worker_id(), 42);
    }

    #[test]
    fn test_generator_thread_safety() {
        let generator = Arc::new(SnowflakeGenerator::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || (0..1000).map(|_| generator.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }
        assert_eq!(ids.len(), 4000);
    }

    #[test]
    fn test_try_new_rejects_wide_worker_id() {
        assert!(SnowflakeGenerator::try_new(1023).is_some());
        assert!(SnowflakeGenerator::try_new(1024).is_none());
    }

    #[test]
    #[should_panic(expected = "Worker ID must be < 1024")]
    fn test_generator_invalid_worker_id() {
        SnowflakeGenerator::new(1024);
    }

    #[test]
    fn test_generated_timestamp_is_current() {
        let generator = SnowflakeGenerator::new(1);
        let before = Utc::now().timestamp_millis();
        let id = generator.generate();
        let after = Utc::now().timestamp_millis();

        assert!(id.timestamp() >= before && id.timestamp() <= after);
    }
}
