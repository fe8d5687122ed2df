use chrono::{DateTime, TimeDelta, Utc};
use wattdf_types::{TimeSeries, WattError, validate_last_step};

use super::calendar;

/// Representative sampling step of a set of instants, at full (nanosecond)
/// resolution.
///
/// The most frequent gap between distinct consecutive instants wins. When
/// several gaps are equally frequent the lower median gap is returned, so the
/// result is always an observed gap. Order and duplicates in the input do not
/// matter. Returns `None` with fewer than two distinct instants.
///
/// ```
/// use chrono::{DateTime, TimeDelta};
/// use wattdf_core::estimate_step;
///
/// let t = |s| DateTime::from_timestamp(s, 0).unwrap();
/// // Gaps 60, 60, 60, 120, 180: the mode is 60 s.
/// let instants = [t(0), t(60), t(120), t(180), t(300), t(480)];
/// assert_eq!(estimate_step(&instants), Some(TimeDelta::seconds(60)));
///
/// // Gaps 60, 60, 120, 120: no single mode, lower median is 60 s.
/// let instants = [t(0), t(60), t(120), t(240), t(360)];
/// assert_eq!(estimate_step(&instants), Some(TimeDelta::seconds(60)));
///
/// let t_ms = |ms| DateTime::from_timestamp_millis(ms).unwrap();
/// assert_eq!(estimate_step(&[t_ms(0), t_ms(500), t_ms(1_000)]), Some(TimeDelta::milliseconds(500)));
/// ```
#[must_use]
pub fn estimate_step(instants: &[DateTime<Utc>]) -> Option<TimeDelta> {
    let mut sorted = instants.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let mut gaps: Vec<TimeDelta> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort_unstable();

    let runs: Vec<(TimeDelta, usize)> = gaps
        .chunk_by(|a, b| a == b)
        .map(|run| (run[0], run.len()))
        .collect();
    let longest = runs.iter().map(|&(_, n)| n).max()?;
    let mut modes = runs.iter().filter(|&&(_, n)| n == longest);
    match (modes.next(), modes.next()) {
        (Some(&(gap, _)), None) => Some(gap),
        _ => Some(gaps[(gaps.len() - 1) / 2]),
    }
}

/// Duration in seconds of the interval following each sample.
///
/// The last entry is `last_step_duration`, or `None` when it is not given:
/// the trailing interval of an interval-sampled series is never guessed.
/// The result keeps the index label and timezone and is named `"duration"`.
///
/// # Errors
/// Returns `WattError::InvalidTimestepDuration` for a non-positive `last_step_duration`.
pub fn timestep_durations(
    series: &TimeSeries,
    last_step_duration: Option<f64>,
) -> Result<TimeSeries, WattError> {
    let last_step_duration = validate_last_step(last_step_duration)?;
    let xs = series.instants();
    let mut durations: Vec<Option<f64>> = xs
        .windows(2)
        .map(|w| Some(calendar::seconds(w[1] - w[0])))
        .collect();
    if !xs.is_empty() {
        durations.push(last_step_duration);
    }
    Ok(TimeSeries::new(xs.to_vec(), durations)?
        .with_metadata_of(series)
        .with_name("duration"))
}

/// Insert missing samples into the holes of a regularly sampled series.
///
/// Every gap longer than `step` (estimated with [`estimate_step`] when
/// `None`) receives `None`-valued samples at `t_i + k * step` for each
/// instant strictly before the next sample. Series with fewer than two
/// samples are returned unchanged.
///
/// # Errors
/// Returns `WattError::InvalidTimestepDuration` if the step is not positive.
pub fn fill_data_holes(
    series: &TimeSeries,
    step: Option<TimeDelta>,
) -> Result<TimeSeries, WattError> {
    let Some(step) = step.or_else(|| estimate_step(series.instants())) else {
        return Ok(series.clone());
    };
    if step <= TimeDelta::zero() {
        return Err(WattError::InvalidTimestepDuration(format!(
            "hole-filling step must be positive, got {step}"
        )));
    }

    let mut instants = Vec::with_capacity(series.len());
    let mut values = Vec::with_capacity(series.len());
    let mut points = series.iter().peekable();
    while let Some((t, v)) = points.next() {
        instants.push(t);
        values.push(v);
        let Some(&(next, _)) = points.peek() else {
            break;
        };
        let mut filler = t + step;
        while filler < next {
            instants.push(filler);
            values.push(None);
            filler += step;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        inserted = instants.len() - series.len(),
        step = %step,
        "filled data holes"
    );

    Ok(TimeSeries::new(instants, values)?.with_metadata_of(series))
}
