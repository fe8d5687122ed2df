//! In-memory time series of nullable scalar samples.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::WattError;

/// Ensure a sequence of instants is strictly increasing.
///
/// # Errors
/// Returns `Err(WattError::InvalidTimeseries)` naming the first offending pair.
pub fn ensure_strictly_increasing(instants: &[DateTime<Utc>], what: &str) -> Result<(), WattError> {
    if let Some(w) = instants.windows(2).find(|w| w[1] <= w[0]) {
        return Err(WattError::InvalidTimeseries(format!(
            "{what} instants must be strictly increasing: {} is followed by {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

fn normalize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// An ordered sequence of `(instant, value)` pairs.
///
/// - Instants are strictly increasing UTC timestamps.
/// - A `None` value is a missing sample; non-finite floats are stored as `None`.
/// - `name` labels the value axis and `index_name` labels the instants; both
///   survive resampling.
/// - `timezone` is the calendar used for day/week/month arithmetic (UTC when unset).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesRepr", into = "TimeSeriesRepr")]
pub struct TimeSeries {
    instants: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
    name: Option<String>,
    index_name: Option<String>,
    timezone: Option<Tz>,
}

#[derive(Serialize, Deserialize)]
struct TimeSeriesRepr {
    instants: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timezone: Option<Tz>,
}

impl TryFrom<TimeSeriesRepr> for TimeSeries {
    type Error = WattError;

    fn try_from(r: TimeSeriesRepr) -> Result<Self, Self::Error> {
        let mut s = Self::new(r.instants, r.values)?;
        s.name = r.name;
        s.index_name = r.index_name;
        s.timezone = r.timezone;
        Ok(s)
    }
}

impl From<TimeSeries> for TimeSeriesRepr {
    fn from(s: TimeSeries) -> Self {
        Self {
            instants: s.instants,
            values: s.values,
            name: s.name,
            index_name: s.index_name,
            timezone: s.timezone,
        }
    }
}

impl TimeSeries {
    /// Build a series from aligned instants and nullable values.
    ///
    /// # Errors
    /// - `WattError::InvalidArg` if the two vectors differ in length.
    /// - `WattError::InvalidTimeseries` if instants are not strictly increasing.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use wattdf_types::TimeSeries;
    ///
    /// let t0 = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    /// let t1 = Utc.with_ymd_and_hms(2022, 1, 2, 0, 0, 0).unwrap();
    /// let s = TimeSeries::new(vec![t0, t1], vec![Some(1.0), Some(f64::NAN)]).unwrap();
    /// assert_eq!(s.values(), &[Some(1.0), None]);
    /// assert!(TimeSeries::new(vec![t1, t0], vec![None, None]).is_err());
    /// ```
    pub fn new(
        instants: Vec<DateTime<Utc>>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, WattError> {
        if instants.len() != values.len() {
            return Err(WattError::InvalidArg(format!(
                "{} instants but {} values",
                instants.len(),
                values.len()
            )));
        }
        ensure_strictly_increasing(&instants, "series")?;
        Ok(Self {
            instants,
            values: values.into_iter().map(normalize).collect(),
            name: None,
            index_name: None,
            timezone: None,
        })
    }

    /// Build a series of plain floats; `NaN` entries become missing samples.
    ///
    /// # Errors
    /// Same as [`TimeSeries::new`].
    pub fn from_f64(instants: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self, WattError> {
        Self::new(instants, values.into_iter().map(Some).collect())
    }

    /// Build a series from `(instant, value)` pairs.
    ///
    /// # Errors
    /// Returns `WattError::InvalidTimeseries` if instants are not strictly increasing.
    pub fn from_points<I>(points: I) -> Result<Self, WattError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, Option<f64>)>,
    {
        let (instants, values) = points.into_iter().unzip();
        Self::new(instants, values)
    }

    /// Set the value-axis label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the index label.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Set the calendar timezone.
    #[must_use]
    pub const fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Replace (or clear) the index label in place.
    pub fn set_index_name(&mut self, name: Option<String>) {
        self.index_name = name;
    }

    /// Copy labels and timezone from `other`, keeping this series' samples.
    #[must_use]
    pub fn with_metadata_of(mut self, other: &Self) -> Self {
        self.name.clone_from(&other.name);
        self.index_name.clone_from(&other.index_name);
        self.timezone = other.timezone;
        self
    }

    /// Sample instants.
    #[must_use]
    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    /// Sample values, aligned with [`instants`](Self::instants).
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value-axis label.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Index label.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Explicit calendar timezone, if any.
    #[must_use]
    pub const fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Calendar timezone used for frequency arithmetic (UTC when unset).
    #[must_use]
    pub fn calendar_tz(&self) -> Tz {
        self.timezone.unwrap_or(Tz::UTC)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// True if the series holds no sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// First instant.
    #[must_use]
    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.instants.first().copied()
    }

    /// Last instant.
    #[must_use]
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.instants.last().copied()
    }

    /// Value at exactly `instant`; `None` when no sample sits there.
    #[must_use]
    pub fn get(&self, instant: DateTime<Utc>) -> Option<Option<f64>> {
        self.instants
            .binary_search(&instant)
            .ok()
            .map(|i| self.values[i])
    }

    /// Iterate over `(instant, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<f64>)> + '_ {
        self.instants.iter().copied().zip(self.values.iter().copied())
    }

    /// Apply `f` to every defined value, keeping instants and metadata.
    #[must_use]
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            values: self.values.iter().map(|v| normalize(v.map(&f))).collect(),
            ..self.clone()
        }
    }

    /// Split into instants and values.
    #[must_use]
    pub fn into_parts(self) -> (Vec<DateTime<Utc>>, Vec<Option<f64>>) {
        (self.instants, self.values)
    }
}
