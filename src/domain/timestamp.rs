//! Last-modified timestamps
//!
//! Source files carry ISO-8601 timestamps with a timezone offset, with or
//! without fractional seconds. A `Z` suffix stands for `+00:00`. Display drops sub-second precision and keeps
//! the original offset.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, ParseError};

const PRIMARY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parsed last-modified instant of a curriculum entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modified(DateTime<FixedOffset>);

impl Modified {
    /// Parse `2021-09-28T09:27:45+00:00`, falling back to
    /// `2021-09-28T09:27:45.123456+00:00`.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let raw = match raw.strip_suffix(['Z', 'z']) {
            Some(utc) => Cow::Owned(format!("{utc}+00:00")),
            None => Cow::Borrowed(raw),
        };
        DateTime::parse_from_str(&raw, PRIMARY_FORMAT)
            .or_else(|_| DateTime::parse_from_str(&raw, FRACTIONAL_FORMAT))
            .map(Self)
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Canonical display text, e.g. `2021-09-28 09:27:45`.
    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl FromStr for Modified {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Modified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}
