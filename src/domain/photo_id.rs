//! Type-safe gallery record identifier.
//!
//! [`PhotoId`] is a newtype wrapper around `i64` so record ids cannot be
//! confused with other integers (byte sizes, timestamps, counters).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a gallery record.
///
/// Assigned once by the record store at insert time (auto-increment or
/// millisecond timestamp, depending on the backend) and immutable
/// thereafter. It is the only handle used by delete and feature toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(i64);

impl PhotoId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhotoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for PhotoId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<PhotoId> for i64 {
    fn from(id: PhotoId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_number() {
        assert_eq!(PhotoId::new(1_700_000_000_123).to_string(), "1700000000123");
    }

    #[test]
    fn serializes_transparently() {
        let Ok(json) = serde_json::to_string(&PhotoId::new(42)) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "42");
    }

    #[test]
    fn parses_from_path_segment() {
        let Ok(id) = " 17 ".parse::<PhotoId>() else {
            panic!("parse failed");
        };
        assert_eq!(id.get(), 17);
        assert!("abc".parse::<PhotoId>().is_err());
    }

    #[test]
    fn orders_by_raw_value() {
        assert!(PhotoId::new(2) > PhotoId::new(1));
    }
}
