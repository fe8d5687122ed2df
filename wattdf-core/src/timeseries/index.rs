use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use wattdf_types::{
    Frequency, FrequencySpec, FrequencyUnit, Origin, WattError, ensure_strictly_increasing,
    validate_last_step,
};

use super::calendar;

/// Largest number of instants a regular grid may produce.
///
/// A fine frequency anchored far from the source (`"1s"` from an origin
/// decades early) would otherwise allocate without bound.
pub const MAX_TARGETS: usize = 10_000_000;

// Lower bound on one step in seconds. Local days may lose an hour to
// daylight saving.
fn shortest_step_seconds(freq: Frequency) -> i64 {
    const HOUR: i64 = 3_600;
    const DAY: i64 = 86_400;
    let n = i64::from(freq.count());
    freq.fixed_seconds().unwrap_or(match freq.unit() {
        FrequencyUnit::Week => n * (7 * DAY - HOUR),
        FrequencyUnit::Month => n * (28 * DAY - HOUR),
        _ => n * (DAY - HOUR),
    })
}

fn too_many(freq: Frequency, estimated: impl std::fmt::Display) -> WattError {
    WattError::Resampling(format!(
        "target grid stepping by {freq} needs about {estimated} instants, more than {MAX_TARGETS}"
    ))
}

fn overflow(freq: Frequency) -> WattError {
    WattError::Resampling(format!("target grid stepping by {freq} leaves the representable time range"))
}

/// Resolve the first instant of a regular grid.
///
/// # Errors
/// Returns `Err(WattError::Resampling)` if the aligned instant cannot be represented.
pub fn grid_start(
    first: DateTime<Utc>,
    freq: Frequency,
    origin: Origin,
    tz: Tz,
) -> Result<DateTime<Utc>, WattError> {
    match origin {
        Origin::Unspecified => Ok(first),
        Origin::Floor => calendar::floor(first, freq, tz).ok_or_else(|| overflow(freq)),
        Origin::Ceil => calendar::ceil(first, freq, tz).ok_or_else(|| overflow(freq)),
        Origin::At(ts) => Ok(ts),
    }
}

/// Build the target instants of a resampling.
///
/// - `FrequencySpec::Instants` is returned as-is (origin is ignored).
/// - `FrequencySpec::Every` starts at the instant resolved from `origin` in
///   timezone `tz` and steps by the frequency.
///   - With `last_step_duration`, the source covers `[first, last + duration)`
///     and instants strictly before that end are emitted.
///   - Without it, instants up to and including the last source instant are
///     emitted. No trailing duration is ever guessed; strategies that need
///     one raise `UndefinedTimestep` themselves.
///
/// # Errors
/// - `WattError::EmptySource` if `instants` is empty.
/// - `WattError::EmptyTargets` if no target instant falls in range.
/// - `WattError::Resampling` if a regular grid would exceed [`MAX_TARGETS`].
/// - `WattError::InvalidTimeseries` if explicit targets are not strictly increasing.
/// - `WattError::InvalidTimestepDuration` if `last_step_duration` is not positive.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf_core::{Frequency, FrequencySpec, Origin, index_to_freq};
///
/// let d = |day| Utc.with_ymd_and_hms(2022, 1, day, 0, 0, 0).unwrap();
/// let source = [d(1), d(2), d(3)];
/// let every_2d = FrequencySpec::Every(Frequency::days(2));
/// let targets = index_to_freq(&source, &every_2d, Origin::Unspecified, None, chrono_tz::UTC).unwrap();
/// assert_eq!(targets, vec![d(1), d(3)]);
///
/// // The trailing day is covered, but its end is excluded.
/// let daily = FrequencySpec::Every(Frequency::days(1));
/// let targets = index_to_freq(&source, &daily, Origin::Unspecified, Some(86_400.0), chrono_tz::UTC).unwrap();
/// assert_eq!(targets, vec![d(1), d(2), d(3)]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "wattdf_core::index_to_freq",
        skip(instants),
        fields(source_len = instants.len()),
        err,
    )
)]
pub fn index_to_freq(
    instants: &[DateTime<Utc>],
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
    tz: Tz,
) -> Result<Vec<DateTime<Utc>>, WattError> {
    let (Some(&first), Some(&last)) = (instants.first(), instants.last()) else {
        return Err(WattError::EmptySource);
    };
    let last_step_duration = validate_last_step(last_step_duration)?;

    let freq = match freq {
        FrequencySpec::Instants(targets) => {
            if targets.is_empty() {
                return Err(WattError::EmptyTargets);
            }
            ensure_strictly_increasing(targets, "target")?;
            return Ok(targets.clone());
        }
        FrequencySpec::Every(f) => *f,
    };

    let start = grid_start(first, freq, origin, tz)?;
    let end = match last_step_duration {
        Some(d) => Some(
            last.checked_add_signed(calendar::delta_from_seconds(d)?)
                .ok_or_else(|| overflow(freq))?,
        ),
        None => None,
    };
    let in_range = |t: DateTime<Utc>| end.map_or(t <= last, |e| t < e);

    let span = (end.unwrap_or(last) - start).num_seconds();
    let estimated = span.max(0) / shortest_step_seconds(freq) + 1;
    if estimated > MAX_TARGETS as i64 {
        return Err(too_many(freq, estimated));
    }

    let mut targets = Vec::new();
    let mut k: u32 = 0;
    loop {
        let t = calendar::advance(start, freq, k, tz).ok_or_else(|| overflow(freq))?;
        if !in_range(t) {
            break;
        }
        if targets.len() == MAX_TARGETS {
            return Err(too_many(freq, format!("{MAX_TARGETS}+")));
        }
        targets.push(t);
        k = k.checked_add(1).ok_or_else(|| overflow(freq))?;
    }

    if targets.is_empty() {
        return Err(WattError::EmptyTargets);
    }
    Ok(targets)
}
