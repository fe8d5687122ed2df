use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use wattdf_types::{TimeFrame, TimeSeries, WattError};

fn coverage(original: &TimeSeries) -> Result<(DateTime<Utc>, DateTime<Utc>), WattError> {
    original
        .first()
        .zip(original.last())
        .ok_or(WattError::EmptySource)
}

/// Replace resampled values outside the span of the original samples.
///
/// Entries strictly before `original.first()` or strictly after
/// `original.last()` become `fill` (use `None` for the missing marker);
/// in-range entries are untouched. A new series is returned.
///
/// # Errors
/// Returns `WattError::EmptySource` if `original` is empty.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf_core::{TimeSeries, trim_out_of_bounds};
///
/// let h = |hour| Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap();
/// let original = TimeSeries::from_f64(vec![h(1), h(2)], vec![1.0, 2.0]).unwrap();
/// let resampled = TimeSeries::from_f64(vec![h(0), h(1), h(2), h(3)], vec![0.5, 1.0, 2.0, 2.5]).unwrap();
/// let trimmed = trim_out_of_bounds(&original, &resampled, None).unwrap();
/// assert_eq!(trimmed.values(), &[None, Some(1.0), Some(2.0), None]);
/// ```
pub fn trim_out_of_bounds(
    original: &TimeSeries,
    resampled: &TimeSeries,
    fill: Option<f64>,
) -> Result<TimeSeries, WattError> {
    let (first, last) = coverage(original)?;
    let values = resampled
        .iter()
        .map(|(t, v)| if t < first || t > last { fill } else { v })
        .collect();
    Ok(TimeSeries::new(resampled.instants().to_vec(), values)?.with_metadata_of(resampled))
}

/// Multi-column form of [`trim_out_of_bounds`].
///
/// `fill_values` maps a column name to the sentinel written outside the
/// original span; columns not listed are untouched.
///
/// # Errors
/// - `WattError::EmptySource` if `original` is empty.
/// - `WattError::InvalidArg` if `fill_values` names a column absent from `resampled`.
pub fn trim_frame_out_of_bounds(
    original: &TimeSeries,
    resampled: &TimeFrame,
    fill_values: &BTreeMap<String, Option<f64>>,
) -> Result<TimeFrame, WattError> {
    let (first, last) = coverage(original)?;
    let mut out = resampled.clone();
    for (column, &fill) in fill_values {
        out.fill_where(column, fill, |t| t < first || t > last)?;
    }
    Ok(out)
}
