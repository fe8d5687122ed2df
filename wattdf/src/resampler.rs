use std::sync::Arc;

use wattdf_core::{
    FrequencySpec, MethodKind, Origin, ResampleConfig, StrategyOptions, TimeSeries, WattError,
    flow_rate_to_freq, index_to_freq, pointwise_strategy, validate_last_step, volume_to_freq,
};

use crate::method::{CustomStrategy, Method};

fn named(kind: MethodKind) -> Result<CustomStrategy, WattError> {
    let strategy = pointwise_strategy(kind).ok_or_else(|| WattError::invalid_method(kind.as_str()))?;
    let apply: CustomStrategy = Arc::new(strategy);
    Ok(apply)
}

/// Resample `series` onto a new grid with the selected method.
///
/// - Conservative methods are handed `freq`, `origin`, and
///   `last_step_duration` unchanged and build their own interval grid.
/// - Pointwise and custom methods receive the target instants built by
///   `index_to_freq` plus the grid settings as [`StrategyOptions`].
/// - The result carries the index label of `series`.
///
/// Methods manage instants outside the source span differently; the named
/// pointwise methods leave them missing. Use
/// [`trim_out_of_bounds`](crate::trim_out_of_bounds) to enforce a sentinel.
///
/// # Errors
/// Propagates every failure of the target builder or the strategy
/// (`EmptySource`, `EmptyTargets`, `UndefinedTimestep`,
/// `InvalidTimestepDuration`, `InvalidTimeseries`, ...).
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wattdf::{Method, Origin, TimeSeries, to_freq};
///
/// let d = |day| Utc.with_ymd_and_hms(2022, 1, day, 0, 0, 0).unwrap();
/// let series = TimeSeries::from_f64(vec![d(1), d(2), d(3)], vec![1.0, 2.0, 3.0]).unwrap();
/// let out = to_freq(&series, &"2D".parse().unwrap(), Origin::Unspecified, None, &Method::PiecewiseAffine).unwrap();
/// assert_eq!(out.instants(), &[d(1), d(3)]);
/// assert_eq!(out.values(), &[Some(1.0), Some(3.0)]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "wattdf::to_freq",
        skip(series, method),
        fields(source_len = series.len(), method = method.name()),
        err,
    )
)]
pub fn to_freq(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
    method: &Method,
) -> Result<TimeSeries, WattError> {
    let apply: CustomStrategy = match method {
        Method::VolumeConservative => {
            return volume_to_freq(series, freq, origin, last_step_duration);
        }
        Method::FlowRateConservative => {
            return flow_rate_to_freq(series, freq, origin, last_step_duration);
        }
        Method::PiecewiseAffine => named(MethodKind::PiecewiseAffine)?,
        Method::PiecewiseConstant => named(MethodKind::PiecewiseConstant)?,
        Method::Custom(f) => Arc::clone(f),
    };

    let targets = index_to_freq(
        series.instants(),
        freq,
        origin,
        last_step_duration,
        series.calendar_tz(),
    )?;
    let options = StrategyOptions::new(freq.clone(), origin, last_step_duration);
    let mut out = apply(series, &targets, &options)?;
    out.set_index_name(series.index_name().map(str::to_string));
    Ok(out)
}

/// Volume-conservative resampling of an energy series.
///
/// # Errors
/// Same as [`volume_to_freq`].
pub fn energy_to_freq(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
) -> Result<TimeSeries, WattError> {
    to_freq(series, freq, origin, last_step_duration, &Method::VolumeConservative)
}

/// Flow-rate-conservative resampling of a power series.
///
/// # Errors
/// Same as [`flow_rate_to_freq`].
pub fn power_to_freq(
    series: &TimeSeries,
    freq: &FrequencySpec,
    origin: Origin,
    last_step_duration: Option<f64>,
) -> Result<TimeSeries, WattError> {
    to_freq(series, freq, origin, last_step_duration, &Method::FlowRateConservative)
}

/// Reusable resampling settings bound to a method.
#[derive(Debug, Clone, Default)]
pub struct Resampler {
    origin: Origin,
    last_step_duration: Option<f64>,
    method: Method,
}

/// Builder for a [`Resampler`].
#[derive(Debug, Clone, Default)]
pub struct ResamplerBuilder {
    origin: Origin,
    last_step_duration: Option<f64>,
    method: Method,
}

impl ResamplerBuilder {
    /// Create a builder with the defaults of [`ResampleConfig`]: grid starts on
    /// the first source instant, trailing interval unknown, piecewise-affine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a serialized configuration.
    #[must_use]
    pub fn config(mut self, cfg: ResampleConfig) -> Self {
        self.origin = cfg.origin;
        self.last_step_duration = cfg.last_step_duration;
        self.method = Method::from(cfg.method);
        self
    }

    /// Select the alignment anchor of regular grids.
    #[must_use]
    pub const fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the duration in seconds of the interval following the last sample.
    ///
    /// Needed by conservative methods whenever a target interval ends after
    /// the last sample, which includes every regular grid.
    #[must_use]
    pub const fn last_step_duration(mut self, seconds: f64) -> Self {
        self.last_step_duration = Some(seconds);
        self
    }

    /// Select the resampling method.
    #[must_use]
    pub fn method(mut self, method: impl Into<Method>) -> Self {
        self.method = method.into();
        self
    }

    /// Build the resampler.
    ///
    /// # Errors
    /// Returns `InvalidTimestepDuration` if the last step is not a finite,
    /// strictly positive number of seconds.
    pub fn build(self) -> Result<Resampler, WattError> {
        validate_last_step(self.last_step_duration)?;
        Ok(Resampler {
            origin: self.origin,
            last_step_duration: self.last_step_duration,
            method: self.method,
        })
    }
}

impl Resampler {
    /// Start building a new `Resampler`.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use wattdf::{Frequency, FrequencySpec, MethodKind, Resampler, TimeSeries};
    ///
    /// let day = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    /// let energy = TimeSeries::from_f64(vec![day], vec![100.0]).unwrap();
    /// let resampler = Resampler::builder()
    ///     .method(MethodKind::VolumeConservative)
    ///     .last_step_duration(86_400.0)
    ///     .build()
    ///     .unwrap();
    /// let out = resampler.to_freq(&energy, &FrequencySpec::Every(Frequency::hours(12))).unwrap();
    /// assert_eq!(out.values(), &[Some(50.0), Some(50.0)]);
    /// ```
    #[must_use]
    pub fn builder() -> ResamplerBuilder {
        ResamplerBuilder::new()
    }

    /// Build a resampler from a serialized configuration.
    ///
    /// # Errors
    /// Same as [`ResamplerBuilder::build`].
    pub fn from_config(cfg: ResampleConfig) -> Result<Self, WattError> {
        ResamplerBuilder::new().config(cfg).build()
    }

    /// Configured alignment anchor.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Configured trailing-interval duration.
    #[must_use]
    pub const fn last_step_duration(&self) -> Option<f64> {
        self.last_step_duration
    }

    /// Configured method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Serializable configuration; `None` when the method is custom.
    #[must_use]
    pub fn config(&self) -> Option<ResampleConfig> {
        let method: MethodKind = self.method.kind()?;
        Some(ResampleConfig {
            origin: self.origin,
            last_step_duration: self.last_step_duration,
            method,
        })
    }

    /// Resample `series` onto `freq` with the configured settings.
    ///
    /// # Errors
    /// Same as [`to_freq`].
    pub fn to_freq(&self, series: &TimeSeries, freq: &FrequencySpec) -> Result<TimeSeries, WattError> {
        to_freq(series, freq, self.origin, self.last_step_duration, &self.method)
    }
}
