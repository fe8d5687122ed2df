//! Configuration types shared by the resampling engine and its facade.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::WattError;

/// Alignment anchor of a regular target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Start the grid on the first source instant.
    #[default]
    Unspecified,
    /// Start on the period boundary at or before the first source instant.
    Floor,
    /// Start on the period boundary at or after the first source instant.
    Ceil,
    /// Start on an explicit instant.
    At(DateTime<Utc>),
}

impl From<DateTime<Utc>> for Origin {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::At(ts)
    }
}

/// Named resampling strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Linear interpolation between bracketing samples.
    #[default]
    PiecewiseAffine,
    /// Hold the last sample at or before each target.
    PiecewiseConstant,
    /// Redistribute interval quantities (energy, volume) by overlap.
    VolumeConservative,
    /// Redistribute rates (power, flow) so their time-integral is kept.
    FlowRateConservative,
}

impl MethodKind {
    /// Every named strategy, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::PiecewiseAffine,
        Self::PiecewiseConstant,
        Self::VolumeConservative,
        Self::FlowRateConservative,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PiecewiseAffine => "piecewise_affine",
            Self::PiecewiseConstant => "piecewise_constant",
            Self::VolumeConservative => "volume_conservative",
            Self::FlowRateConservative => "flow_rate_conservative",
        }
    }

    /// True for the strategies that build their own interval grid.
    #[must_use]
    pub const fn is_conservative(self) -> bool {
        matches!(self, Self::VolumeConservative | Self::FlowRateConservative)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = WattError;

    /// Accepts snake_case and kebab-case names.
    ///
    /// ```
    /// use wattdf_types::MethodKind;
    ///
    /// assert_eq!("piecewise-affine".parse::<MethodKind>().unwrap(), MethodKind::PiecewiseAffine);
    /// assert_eq!("volume_conservative".parse::<MethodKind>().unwrap(), MethodKind::VolumeConservative);
    /// assert!("cubic".parse::<MethodKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| WattError::invalid_method(s))
    }
}

/// Reusable resampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Alignment anchor of the target grid.
    #[serde(default)]
    pub origin: Origin,
    /// Duration in seconds of the interval following the last sample.
    ///
    /// Without it the last sample's interval is unknown, and the conservative
    /// strategies fail on any target interval that ends after the last
    /// sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_step_duration: Option<f64>,
    /// Strategy applied to the source series.
    #[serde(default)]
    pub method: MethodKind,
}

impl ResampleConfig {
    /// Check the configured last step.
    ///
    /// # Errors
    /// Returns `WattError::InvalidTimestepDuration` if `last_step_duration` is
    /// set and not a finite, strictly positive number of seconds.
    pub fn validate(&self) -> Result<(), WattError> {
        validate_last_step(self.last_step_duration).map(|_| ())
    }
}

/// Check an optional trailing-interval duration and return it unchanged.
///
/// # Errors
/// Returns `WattError::InvalidTimestepDuration` for non-finite or non-positive durations.
pub fn validate_last_step(last_step_duration: Option<f64>) -> Result<Option<f64>, WattError> {
    match last_step_duration {
        Some(d) if !(d.is_finite() && d > 0.0) => Err(WattError::InvalidTimestepDuration(format!(
            "last step duration must be a finite positive number of seconds, got {d}"
        ))),
        other => Ok(other),
    }
}
