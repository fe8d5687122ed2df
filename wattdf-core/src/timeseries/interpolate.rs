use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wattdf_types::{
    FrequencySpec, MethodKind, Origin, TimeSeries, WattError, ensure_strictly_increasing,
    validate_last_step,
};

use super::calendar;

/// Grid settings forwarded to a pointwise or custom strategy along with the
/// already materialized target instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOptions {
    /// Frequency (or explicit instants) the targets were built from.
    pub freq: FrequencySpec,
    /// Alignment anchor used for the targets.
    pub origin: Origin,
    /// Duration in seconds of the interval following the last source sample.
    pub last_step_duration: Option<f64>,
}

impl StrategyOptions {
    /// Bundle grid settings.
    #[must_use]
    pub const fn new(freq: FrequencySpec, origin: Origin, last_step_duration: Option<f64>) -> Self {
        Self {
            freq,
            origin,
            last_step_duration,
        }
    }
}

/// Signature shared by the pointwise strategies: `(source, targets, options) -> resampled`.
pub type StrategyFn =
    fn(&TimeSeries, &[DateTime<Utc>], &StrategyOptions) -> Result<TimeSeries, WattError>;

/// Look up the implementation of a pointwise strategy.
///
/// Conservative strategies are not target-driven (they build their own
/// interval grid) and return `None`.
#[must_use]
pub const fn pointwise_strategy(kind: MethodKind) -> Option<StrategyFn> {
    match kind {
        MethodKind::PiecewiseAffine => Some(piecewise_affine),
        MethodKind::PiecewiseConstant => Some(piecewise_constant),
        MethodKind::VolumeConservative | MethodKind::FlowRateConservative => None,
    }
}

/// Validate a `(source, targets)` pair the way every strategy expects it.
///
/// # Errors
/// `EmptySource`, `EmptyTargets`, or `InvalidTimeseries` for unordered targets.
pub fn check_inputs(series: &TimeSeries, targets: &[DateTime<Utc>]) -> Result<(), WattError> {
    if series.is_empty() {
        return Err(WattError::EmptySource);
    }
    if targets.is_empty() {
        return Err(WattError::EmptyTargets);
    }
    ensure_strictly_increasing(targets, "target")
}

fn finish(
    series: &TimeSeries,
    targets: &[DateTime<Utc>],
    values: Vec<Option<f64>>,
) -> Result<TimeSeries, WattError> {
    Ok(TimeSeries::new(targets.to_vec(), values)?.with_metadata_of(series))
}

/// Linear interpolation between the two samples bracketing each target.
///
/// - A target equal to a source instant gets that sample's value exactly.
/// - Targets strictly before the first or after the last sample are `None`
///   (no extrapolation).
/// - A missing bracketing sample yields `None`.
///
/// # Errors
/// `EmptySource`, `EmptyTargets`, or `InvalidTimeseries` for unordered targets.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf_core::{FrequencySpec, Origin, StrategyOptions, TimeSeries, piecewise_affine};
///
/// let h = |hour| Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap();
/// let s = TimeSeries::from_f64(vec![h(0), h(2)], vec![10.0, 20.0]).unwrap();
/// let opts = StrategyOptions::new(FrequencySpec::Instants(vec![]), Origin::Unspecified, None);
/// let out = piecewise_affine(&s, &[h(0), h(1), h(3)], &opts).unwrap();
/// assert_eq!(out.values(), &[Some(10.0), Some(15.0), None]);
/// ```
pub fn piecewise_affine(
    series: &TimeSeries,
    targets: &[DateTime<Utc>],
    _options: &StrategyOptions,
) -> Result<TimeSeries, WattError> {
    check_inputs(series, targets)?;
    let xs = series.instants();
    let ys = series.values();

    let values = targets
        .iter()
        .map(|&t| {
            // Number of samples at or before `t`.
            let after = xs.partition_point(|&x| x <= t);
            if after == 0 {
                return None;
            }
            let i = after - 1;
            if xs[i] == t {
                return ys[i];
            }
            let j = after;
            if j == xs.len() {
                return None;
            }
            let (y0, y1) = (ys[i]?, ys[j]?);
            let alpha = calendar::seconds(t - xs[i]) / calendar::seconds(xs[j] - xs[i]);
            Some(y0 + alpha * (y1 - y0))
        })
        .collect();

    finish(series, targets, values)
}

/// Hold the value of the last sample at or before each target.
///
/// - Targets before the first sample are `None`.
/// - Targets after the last sample are `None`, unless `last_step_duration`
///   is set and the target falls inside `[last, last + last_step_duration)`.
/// - Values are copied, never blended.
///
/// # Errors
/// `EmptySource`, `EmptyTargets`, `InvalidTimeseries` for unordered targets,
/// or `InvalidTimestepDuration` for a non-positive `last_step_duration`.
pub fn piecewise_constant(
    series: &TimeSeries,
    targets: &[DateTime<Utc>],
    options: &StrategyOptions,
) -> Result<TimeSeries, WattError> {
    check_inputs(series, targets)?;
    let xs = series.instants();
    let ys = series.values();
    let last = xs[xs.len() - 1];
    let hold_until = match validate_last_step(options.last_step_duration)? {
        Some(d) => last.checked_add_signed(calendar::delta_from_seconds(d)?),
        None => None,
    };

    let values = targets
        .iter()
        .map(|&t| {
            let after = xs.partition_point(|&x| x <= t);
            if after == 0 {
                return None;
            }
            if t > last && hold_until.is_none_or(|end| t >= end) {
                return None;
            }
            ys[after - 1]
        })
        .collect();

    finish(series, targets, values)
}
