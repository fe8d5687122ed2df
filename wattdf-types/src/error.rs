use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the wattdf workspace.
///
/// The variants form a small taxonomy. Callers that only care about the
/// family of a failure use the classification helpers
/// ([`is_data_error`](Self::is_data_error),
/// [`is_invalid_timeseries`](Self::is_invalid_timeseries),
/// [`is_resampling_error`](Self::is_resampling_error)); callers that want a
/// specific remediation (e.g. supplying `last_step_duration` after an
/// `UndefinedTimestep`) match on the variant.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WattError {
    /// A required data container has no entries.
    #[error("empty data: {what}")]
    EmptyData {
        /// Description of the empty container, e.g. "frame columns".
        what: String,
    },

    /// A timeseries is inconsistent (unordered instants, mismatched lengths, ...).
    #[error("invalid timeseries: {0}")]
    InvalidTimeseries(String),

    /// The duration of a timestep of an interval-sampled series cannot be resolved.
    #[error("undefined timestep: {0}")]
    UndefinedTimestep(String),

    /// A supplied or derived timestep duration violates its constraints.
    #[error("invalid timestep duration: {0}")]
    InvalidTimestepDuration(String),

    /// A resampling operation is impossible.
    #[error("resampling failed: {0}")]
    Resampling(String),

    /// The source series of a resampling has no samples.
    #[error("cannot resample an empty source series")]
    EmptySource,

    /// The resolved set of target instants is empty.
    #[error("cannot resample to an empty set of target instants")]
    EmptyTargets,

    /// The requested method name is not a known resampling strategy.
    #[error("unknown resampling method: {name}")]
    InvalidMethod {
        /// The rejected method name.
        name: String,
    },

    /// A frequency string could not be parsed or describes a null step.
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl WattError {
    /// Helper: build an `EmptyData` error for a description of the empty container.
    pub fn empty_data(what: impl Into<String>) -> Self {
        Self::EmptyData { what: what.into() }
    }

    /// Helper: build an `InvalidMethod` error for a rejected method name.
    pub fn invalid_method(name: impl Into<String>) -> Self {
        Self::InvalidMethod { name: name.into() }
    }

    /// Returns true for failures caused by missing data.
    ///
    /// `EmptySource` and `EmptyTargets` are both resampling errors and
    /// empty-data errors.
    #[must_use]
    pub const fn is_empty_data(&self) -> bool {
        matches!(
            self,
            Self::EmptyData { .. } | Self::EmptySource | Self::EmptyTargets
        )
    }

    /// Returns true for any data-validity failure of the empty-data family.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        self.is_empty_data()
    }

    /// Returns true for failures describing an inconsistent timeseries.
    #[must_use]
    pub const fn is_invalid_timeseries(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeseries(_)
                | Self::UndefinedTimestep(_)
                | Self::InvalidTimestepDuration(_)
        )
    }

    /// Returns true for failures raised by a resampling operation itself.
    #[must_use]
    pub const fn is_resampling_error(&self) -> bool {
        matches!(
            self,
            Self::Resampling(_) | Self::EmptySource | Self::EmptyTargets | Self::InvalidMethod { .. }
        )
    }
}
