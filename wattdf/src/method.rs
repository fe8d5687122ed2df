use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use wattdf_core::{MethodKind, StrategyOptions, TimeSeries, WattError};

/// Caller-supplied strategy: `(source, target instants, options) -> resampled`.
///
/// It receives the target instants already built by `index_to_freq` and the
/// grid settings they were built from.
pub type CustomStrategy = Arc<
    dyn Fn(&TimeSeries, &[DateTime<Utc>], &StrategyOptions) -> Result<TimeSeries, WattError>
        + Send
        + Sync,
>;

/// Resampling method: one of the named strategies, or a custom function.
#[derive(Clone, Default)]
pub enum Method {
    /// Linear interpolation between bracketing samples.
    #[default]
    PiecewiseAffine,
    /// Hold the last sample at or before each target.
    PiecewiseConstant,
    /// Conserve interval quantities (energy, volume).
    VolumeConservative,
    /// Conserve the time-integral of rates (power, flow).
    FlowRateConservative,
    /// Caller-supplied strategy applied to the built target instants.
    Custom(CustomStrategy),
}

impl Method {
    /// Wrap a function or closure as a custom strategy.
    ///
    /// ```
    /// use wattdf::{Method, TimeSeries};
    ///
    /// // Zero-order strategy that ignores the source values.
    /// let zeros = Method::custom(|source, targets, _opts| {
    ///     TimeSeries::from_f64(targets.to_vec(), vec![0.0; targets.len()])
    ///         .map(|s| s.with_metadata_of(source))
    /// });
    /// assert_eq!(zeros.name(), "custom");
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&TimeSeries, &[DateTime<Utc>], &StrategyOptions) -> Result<TimeSeries, WattError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Tag of a named strategy; `None` for custom strategies.
    #[must_use]
    pub const fn kind(&self) -> Option<MethodKind> {
        match self {
            Self::PiecewiseAffine => Some(MethodKind::PiecewiseAffine),
            Self::PiecewiseConstant => Some(MethodKind::PiecewiseConstant),
            Self::VolumeConservative => Some(MethodKind::VolumeConservative),
            Self::FlowRateConservative => Some(MethodKind::FlowRateConservative),
            Self::Custom(_) => None,
        }
    }

    /// Canonical name, `"custom"` for caller-supplied strategies.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.as_str(),
            None => "custom",
        }
    }
}

impl From<MethodKind> for Method {
    fn from(kind: MethodKind) -> Self {
        match kind {
            MethodKind::PiecewiseAffine => Self::PiecewiseAffine,
            MethodKind::PiecewiseConstant => Self::PiecewiseConstant,
            MethodKind::VolumeConservative => Self::VolumeConservative,
            MethodKind::FlowRateConservative => Self::FlowRateConservative,
        }
    }
}

impl FromStr for Method {
    type Err = WattError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<MethodKind>().map(Self::from)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            named => f.write_str(named.name()),
        }
    }
}
