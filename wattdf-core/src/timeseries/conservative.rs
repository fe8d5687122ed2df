use chrono::{DateTime, Utc};
use wattdf_types::{FrequencySpec, Origin, TimeSeries, WattError, validate_last_step};

use super::calendar;
use super::index::index_to_freq;

/// A partition of time into consecutive half-open intervals.
///
/// `bounds` holds one more entry than `values`: interval `i` spans
/// `[bounds[i], bounds[i + 1])`.
struct Intervals {
    bounds: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
}

impl Intervals {
    fn duration(&self, i: usize) -> f64 {
        calendar::seconds(self.bounds[i + 1] - self.bounds[i])
    }
}

/// Quantity gathered by one target interval.
struct Gathered {
    quantity: Option<f64>,
    covered: f64,
}

// Each sample labels the interval that follows it. The final sample needs
// `last_step_duration`; without it that sample carries no interval.
fn source_intervals(
    series: &TimeSeries,
    last_step_duration: Option<f64>,
) -> Result<Intervals, WattError> {
    let mut bounds = series.instants().to_vec();
    let mut values = series.values().to_vec();
    match last_step_duration {
        Some(d) => {
            let last = bounds[bounds.len() - 1];
            let end = last
                .checked_add_signed(calendar::delta_from_seconds(d)?)
                .ok_or_else(|| {
                    WattError::InvalidTimestepDuration(format!(
                        "last step of {d} s overflows the time range"
                    ))
                })?;
            bounds.push(end);
        }
        None => {
            if values.len() < 2 {
                return Err(WattError::UndefinedTimestep(
                    "the only sample has no following instant; pass last_step_duration".into(),
                ));
            }
            values.pop();
        }
    }
    Ok(Intervals { bounds, values })
}

// Interval bounds of the targets. A regular grid closes on its next step;
// explicit targets close on `last_step_duration` when given, otherwise the
// final target gets no interval.
fn target_bounds(
    targets: Vec<DateTime<Utc>>,
    freq: &FrequencySpec,
    last_step_duration: Option<f64>,
    tz: chrono_tz::Tz,
) -> Result<(Vec<DateTime<Utc>>, usize), WattError> {
    let n_targets = targets.len();
    let closing = match freq {
        FrequencySpec::Every(f) => {
            let k = u32::try_from(n_targets).map_err(|_| {
                WattError::Resampling(format!("too many target instants: {n_targets}"))
            })?;
            Some(calendar::advance(targets[0], *f, k, tz).ok_or_else(|| {
                WattError::Resampling(format!("closing step of {f} leaves the time range"))
            })?)
        }
        FrequencySpec::Instants(_) => match last_step_duration {
            Some(d) => targets[n_targets - 1].checked_add_signed(calendar::delta_from_seconds(d)?),
            None => None,
        },
    };
    let mut bounds = targets;
    bounds.extend(closing);
    Ok((bounds, n_targets))
}

// Without `last_step_duration` the source is only known up to its last
// instant. A target interval reaching past it would need the trailing
// interval of the last sample.
fn ensure_within_known_intervals(
    series: &TimeSeries,
    target_bounds: &[DateTime<Utc>],
) -> Result<(), WattError> {
    let (Some(last), [.., _, end]) = (series.last(), target_bounds) else {
        return Ok(());
    };
    if *end > last {
        return Err(WattError::UndefinedTimestep(format!(
            "target interval ending at {end} needs the interval after the last sample at {last}; pass last_step_duration"
        )));
    }
    Ok(())
}

/// Spread each source quantity over the target intervals in proportion to
/// the overlap duration. The sweep is linear in `source + target` size.
fn redistribute(source: &Intervals, target_bounds: &[DateTime<Utc>]) -> Vec<Gathered> {
    let n_src = source.values.len();
    let mut i = 0usize;
    target_bounds
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            while i < n_src && source.bounds[i + 1] <= a {
                i += 1;
            }
            let mut quantity = Some(0.0);
            let mut covered = 0.0;
            let mut touched = false;
            let mut k = i;
            while k < n_src && source.bounds[k] < b {
                let (lo, hi) = (source.bounds[k].max(a), source.bounds[k + 1].min(b));
                if hi > lo {
                    let fraction = if lo == source.bounds[k] && hi == source.bounds[k + 1] {
                        1.0
                    } else {
                        calendar::seconds(hi - lo) / source.duration(k)
                    };
                    quantity = quantity.zip(source.values[k]).map(|(acc, q)| acc + q * fraction);
                    covered += calendar::seconds(hi - lo);
                    touched = true;
                }
                k += 1;
            }
            Gathered {
                quantity: quantity.filter(|_| touched),
                covered,
            }
        })
        .collect()
}

fn conservative_to_freq<Q, V>(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
    quantity_of: Q,
    value_of: V,
) -> Result<TimeSeries, WattError>
where
    Q: Fn(&Intervals, usize) -> Option<f64>,
    V: Fn(&Gathered) -> Option<f64>,
{
    if series.is_empty() {
        return Err(WattError::EmptySource);
    }
    let last_step_duration = validate_last_step(last_step_duration)?;
    let mut source = source_intervals(series, last_step_duration)?;
    source.values = (0..source.values.len())
        .map(|i| quantity_of(&source, i))
        .collect();

    let tz = series.calendar_tz();
    let targets = index_to_freq(series.instants(), freq, origin, last_step_duration, tz)?;
    let (bounds, n_targets) = target_bounds(targets, freq, last_step_duration, tz)?;
    if last_step_duration.is_none() {
        ensure_within_known_intervals(series, &bounds)?;
    }

    let gathered = redistribute(&source, &bounds);
    #[cfg(feature = "tracing")]
    {
        let uncovered = gathered.iter().filter(|g| g.covered <= 0.0).count();
        if uncovered > 0 {
            tracing::debug!(uncovered, "target intervals outside source coverage are left missing");
        }
    }
    let mut values: Vec<Option<f64>> = gathered.iter().map(value_of).collect();
    // An explicit grid without last_step_duration leaves the final target open.
    values.resize(n_targets, None);

    let mut instants = bounds;
    instants.truncate(n_targets);
    Ok(TimeSeries::new(instants, values)?.with_metadata_of(series))
}

/// Resample an interval quantity (energy, volume) while conserving its total.
///
/// Sample `i` is the quantity accumulated over `[t_i, t_{i+1})`; the final
/// sample covers `[t_n, t_n + last_step_duration)`. Without
/// `last_step_duration` the final sample's interval is unknown, so every
/// target interval must end at or before the last source instant. Each target
/// interval receives the share of every overlapping source quantity
/// proportional to the overlap duration, so the sum over targets equals the
/// sum over the source intervals they cover.
///
/// Target intervals overlapping no source interval, or overlapping a missing
/// sample, are `None`.
///
/// # Errors
/// - `WattError::EmptySource` for an empty series.
/// - `WattError::EmptyTargets` if the resolved grid is empty.
/// - `WattError::UndefinedTimestep` without `last_step_duration` when the
///   source has a single sample or a target interval ends after the last
///   source instant.
/// - `WattError::InvalidTimestepDuration` for a non-positive `last_step_duration`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf_core::{Frequency, FrequencySpec, Origin, TimeSeries, volume_to_freq};
///
/// let day = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
/// let energy = TimeSeries::from_f64(vec![day], vec![100.0]).unwrap();
/// let half_days = FrequencySpec::Every(Frequency::hours(12));
/// let out = volume_to_freq(&energy, &half_days, Origin::Unspecified, Some(86_400.0)).unwrap();
/// assert_eq!(out.values(), &[Some(50.0), Some(50.0)]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "wattdf_core::volume_to_freq",
        skip(series),
        fields(source_len = series.len()),
        err,
    )
)]
pub fn volume_to_freq(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
) -> Result<TimeSeries, WattError> {
    conservative_to_freq(
        series,
        freq,
        origin,
        last_step_duration,
        |src, i| src.values[i],
        |g| g.quantity,
    )
}

/// Resample a rate (power, flow) while conserving its time-integral.
///
/// Each sample is a rate held over its interval (same convention as
/// [`volume_to_freq`]). Rates are turned into quantities (`rate × duration`),
/// redistributed conservatively, and divided by the part of each target
/// interval actually covered by the source. A fully covered target therefore
/// holds the mean rate over its interval.
///
/// # Errors
/// Same as [`volume_to_freq`].
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf_core::{Frequency, FrequencySpec, Origin, TimeSeries, flow_rate_to_freq};
///
/// let h = |hour| Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap();
/// let power = TimeSeries::from_f64(vec![h(0), h(1)], vec![2.0, 4.0]).unwrap();
/// let two_hours = FrequencySpec::Every(Frequency::hours(2));
/// let out = flow_rate_to_freq(&power, &two_hours, Origin::Unspecified, Some(3_600.0)).unwrap();
/// assert_eq!(out.values(), &[Some(3.0)]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "wattdf_core::flow_rate_to_freq",
        skip(series),
        fields(source_len = series.len()),
        err,
    )
)]
pub fn flow_rate_to_freq(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
) -> Result<TimeSeries, WattError> {
    conservative_to_freq(
        series,
        freq,
        origin,
        last_step_duration,
        |src, i| src.values[i].map(|rate| rate * src.duration(i)),
        |g| g.quantity.filter(|_| g.covered > 0.0).map(|q| q / g.covered),
    )
}
