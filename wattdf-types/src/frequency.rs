//! Sampling frequencies and target-grid specifications.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::WattError;

/// Calendar unit of a [`Frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    /// Fixed one-second step.
    Second,
    /// Fixed sixty-second step.
    Minute,
    /// Fixed 3600-second step.
    Hour,
    /// Local calendar day (23 h or 25 h across DST changes).
    Day,
    /// Local calendar week, anchored on Monday.
    Week,
    /// Local calendar month, anchored on the first day.
    Month,
}

impl FrequencyUnit {
    /// Length in seconds for units that have a fixed duration.
    #[must_use]
    pub const fn fixed_seconds(self) -> Option<i64> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(60),
            Self::Hour => Some(3_600),
            Self::Day | Self::Week | Self::Month => None,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "MS",
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        let unit = match token {
            "s" | "S" | "sec" | "second" | "seconds" => Self::Second,
            "min" | "T" | "minute" | "minutes" => Self::Minute,
            "h" | "H" | "hour" | "hours" => Self::Hour,
            "D" | "d" | "day" | "days" => Self::Day,
            "W" | "w" | "week" | "weeks" => Self::Week,
            "MS" | "M" | "month" | "months" => Self::Month,
            _ => return None,
        };
        Some(unit)
    }
}

/// A uniform sampling step: `count` repetitions of a calendar `unit`.
///
/// Parses from compact period strings:
///
/// ```
/// use wattdf_types::{Frequency, FrequencyUnit};
///
/// let f: Frequency = "15min".parse().unwrap();
/// assert_eq!(f.count(), 15);
/// assert_eq!(f.unit(), FrequencyUnit::Minute);
/// assert_eq!("1 day".parse::<Frequency>().unwrap(), Frequency::days(1));
/// assert_eq!("2D".parse::<Frequency>().unwrap().to_string(), "2D");
/// assert!("0h".parse::<Frequency>().is_err());
/// assert!("fortnight".parse::<Frequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    count: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    /// Build a frequency from a positive repetition count and a unit.
    ///
    /// # Errors
    /// Returns `WattError::InvalidFrequency` if `count` is zero.
    pub fn new(count: u32, unit: FrequencyUnit) -> Result<Self, WattError> {
        if count == 0 {
            return Err(WattError::InvalidFrequency(format!(
                "a frequency needs a positive count, got 0{}",
                unit.suffix()
            )));
        }
        Ok(Self { count, unit })
    }

    /// `n` seconds. A zero count is promoted to one.
    #[must_use]
    pub fn seconds(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Second }
    }

    /// `n` minutes. A zero count is promoted to one.
    #[must_use]
    pub fn minutes(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Minute }
    }

    /// `n` hours. A zero count is promoted to one.
    #[must_use]
    pub fn hours(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Hour }
    }

    /// `n` local days. A zero count is promoted to one.
    #[must_use]
    pub fn days(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Day }
    }

    /// `n` local weeks. A zero count is promoted to one.
    #[must_use]
    pub fn weeks(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Week }
    }

    /// `n` local months. A zero count is promoted to one.
    #[must_use]
    pub fn months(n: u32) -> Self {
        Self { count: n.max(1), unit: FrequencyUnit::Month }
    }

    /// Repetition count.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Calendar unit.
    #[must_use]
    pub const fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Step length in seconds when the unit has a fixed duration (sub-daily steps).
    #[must_use]
    pub const fn fixed_seconds(&self) -> Option<i64> {
        match self.unit.fixed_seconds() {
            Some(s) => Some(s * self.count as i64),
            None => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit == FrequencyUnit::Month && self.count == 1 {
            return f.write_str("MS");
        }
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Frequency {
    type Err = WattError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, rest) = trimmed.split_at(split);
        let count = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|e| WattError::InvalidFrequency(format!("{s:?}: {e}")))?
        };
        let unit = FrequencyUnit::parse_token(rest.trim_start())
            .ok_or_else(|| WattError::InvalidFrequency(format!("unknown unit in {s:?}")))?;
        Self::new(count, unit)
    }
}

impl TryFrom<String> for Frequency {
    type Error = WattError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

/// The target grid of a resampling: a regular frequency, or explicit instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    /// Regular grid stepping by a frequency from the resolved origin.
    Every(Frequency),
    /// Caller-supplied target instants, used as-is.
    Instants(Vec<DateTime<Utc>>),
}

impl From<Frequency> for FrequencySpec {
    fn from(f: Frequency) -> Self {
        Self::Every(f)
    }
}

impl From<Vec<DateTime<Utc>>> for FrequencySpec {
    fn from(instants: Vec<DateTime<Utc>>) -> Self {
        Self::Instants(instants)
    }
}

impl From<&[DateTime<Utc>]> for FrequencySpec {
    fn from(instants: &[DateTime<Utc>]) -> Self {
        Self::Instants(instants.to_vec())
    }
}

impl FromStr for FrequencySpec {
    type Err = WattError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::Every)
    }
}

impl TryFrom<&str> for FrequencySpec {
    type Error = WattError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
