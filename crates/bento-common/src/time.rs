//! Duration and instant payload types.
//!
//! Both are carried as signed 64-bit microsecond counts. Instants count from
//! the Unix epoch and reserve three sentinels that have their own text
//! spelling: `PAST`, `FUTURE` and `NEVER`.

use std::fmt;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, WriteBytesExt};

use crate::lenient::parse_int;
use crate::{BinaryReader, Result};

/// A signed span of time with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    micros: i64,
}

impl Duration {
    /// Encoded payload width in bytes.
    pub const BINARY_SIZE: u64 = 8;

    pub const ZERO: Self = Self { micros: 0 };

    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self { micros: millis.saturating_mul(1_000) }
    }

    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self { micros: secs.saturating_mul(1_000_000) }
    }

    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    /// Read from the wire.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_i64().map(Self::from_micros)
    }

    /// Write to the wire.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_i64::<BigEndian>(self.micros)?;
        Ok(())
    }

    /// Parse the microsecond text form leniently.
    pub fn from_text(text: &str) -> Self {
        Self::from_micros(parse_int(text))
    }
}

impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        Self::from_micros(i64::try_from(value.as_micros()).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.micros)
    }
}

/// A point in time, in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instant {
    micros: i64,
}

impl Instant {
    /// Encoded payload width in bytes.
    pub const BINARY_SIZE: u64 = 8;

    /// An instant that never happens.
    pub const NEVER: Self = Self { micros: i64::MIN };

    /// Earlier than any real instant.
    pub const PAST: Self = Self { micros: i64::MIN + 1 };

    /// Later than any real instant.
    pub const FUTURE: Self = Self { micros: i64::MAX };

    pub const EPOCH: Self = Self { micros: 0 };

    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let micros = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => i64::try_from(since.as_micros()).unwrap_or(i64::MAX - 1),
            Err(before) => -i64::try_from(before.duration().as_micros()).unwrap_or(i64::MAX - 1),
        };
        Self { micros }
    }

    /// The text spelling of a sentinel, if this is one.
    pub fn keyword(&self) -> Option<&'static str> {
        match self.micros {
            i64::MIN => Some("NEVER"),
            m if m == i64::MIN + 1 => Some("PAST"),
            i64::MAX => Some("FUTURE"),
            _ => None,
        }
    }

    /// Resolve a keyword (`NOW`, `PAST`, `FUTURE`, `NEVER`).
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "NOW" => Some(Self::now()),
            "PAST" => Some(Self::PAST),
            "FUTURE" => Some(Self::FUTURE),
            "NEVER" => Some(Self::NEVER),
            _ => None,
        }
    }

    /// Read from the wire.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_i64().map(Self::from_micros)
    }

    /// Write to the wire.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_i64::<BigEndian>(self.micros)?;
        Ok(())
    }

    /// Parse a keyword or microsecond count leniently.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        Self::from_keyword(text).unwrap_or_else(|| Self::from_micros(parse_int(text)))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword() {
            Some(word) => f.write_str(word),
            None => write!(f, "{}", self.micros),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(Instant::NEVER.to_string(), "NEVER");
        assert_eq!(Instant::PAST.to_string(), "PAST");
        assert_eq!(Instant::FUTURE.to_string(), "FUTURE");
        assert_eq!(Instant::from_text("FUTURE"), Instant::FUTURE);
        assert_eq!(Instant::from_text("1700000000000000").as_micros(), 1_700_000_000_000_000);
    }

    #[test]
    fn test_now_is_after_epoch() {
        let now = Instant::now();
        assert!(now > Instant::EPOCH);
        assert!(now.keyword().is_none());
    }

    #[test]
    fn test_duration_text() {
        assert_eq!(Duration::from_secs(2).to_string(), "2000000");
        assert_eq!(Duration::from_text("-15"), Duration::from_micros(-15));
        assert_eq!(
            Duration::from(std::time::Duration::from_millis(3)),
            Duration::from_millis(3)
        );
    }

    #[test]
    fn test_binary() {
        let mut out = Vec::new();
        Instant::from_micros(1).write(&mut out).unwrap();
        assert_eq!(out, [0, 0, 0, 0, 0, 0, 0, 1]);
        let mut reader = BinaryReader::new(&out);
        assert_eq!(Instant::read(&mut reader).unwrap(), Instant::from_micros(1));
    }
}
