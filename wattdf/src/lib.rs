//! wattdf resamples energy and physical time series onto new instants.
//!
//! Overview
//! - Builds target instants from a frequency (`"15min"`, `"1h"`, `"2D"`, `"W"`,
//!   `"MS"`) or from an explicit list, anchored by an [`Origin`].
//! - Pointwise strategies (`PiecewiseAffine`, `PiecewiseConstant`) read the
//!   source at each target instant.
//! - Conservative strategies (`VolumeConservative`, `FlowRateConservative`)
//!   redistribute interval quantities so totals survive the change of grid.
//! - Callers may plug their own strategy with [`Method::custom`].
//!
//! Interval convention
//! - Sample `i` describes `[t_i, t_{i+1})`. The last sample describes
//!   `[t_n, t_n + last_step_duration)`. Without a last step the conservative
//!   strategies reject target intervals that end after the last sample.
//! - Day, week, and month frequencies step in the series' calendar timezone
//!   (UTC unless set with [`TimeSeries::with_timezone`]), so daylight-saving
//!   days are 23 or 25 hours long.
//!
//! Key behaviors and trade-offs
//! - Targets outside the source span are left missing (`None`) by the named
//!   strategies; [`trim_out_of_bounds`] rewrites them with a chosen sentinel.
//! - Missing samples propagate: any target that depends on a missing value
//!   is missing itself.
//! - A conservative target that no source interval covers is missing; a
//!   partially covered target receives only the covered part.
//!
//! Examples
//! Energy redistributed to half-days:
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use wattdf::{Origin, TimeSeries, energy_to_freq};
//!
//! let day = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
//! let energy = TimeSeries::from_f64(vec![day], vec![100.0]).unwrap();
//! let out = energy_to_freq(&energy, &"12h".parse().unwrap(), Origin::Unspecified, Some(86_400.0)).unwrap();
//! assert_eq!(out.values(), &[Some(50.0), Some(50.0)]);
//! ```
//!
//! A reusable resampler built from configuration:
//! ```rust
//! use wattdf::{MethodKind, ResampleConfig, Resampler};
//!
//! let cfg: ResampleConfig = serde_json::from_str(r#"{"method":"flow_rate_conservative"}"#).unwrap();
//! let resampler = Resampler::from_config(cfg).unwrap();
//! assert_eq!(resampler.method().kind(), Some(MethodKind::FlowRateConservative));
//! ```
//!
//! Enable the `tracing` feature to record a span per resampling call.
#![warn(missing_docs)]

mod method;
mod resampler;

pub use method::{CustomStrategy, Method};
pub use resampler::{Resampler, ResamplerBuilder, energy_to_freq, power_to_freq, to_freq};

pub use wattdf_core::{
    // Containers
    DEFAULT_COLUMN,
    // Frequencies and configuration
    Frequency,
    FrequencySpec,
    FrequencyUnit,
    MAX_TARGETS,
    MethodKind,
    Origin,
    ResampleConfig,
    // Strategy contract
    StrategyFn,
    StrategyOptions,
    TimeFrame,
    TimeSeries,
    WattError,
    // Operations
    estimate_step,
    fill_data_holes,
    flow_rate_to_freq,
    index_to_freq,
    piecewise_affine,
    piecewise_constant,
    timestep_durations,
    trim_frame_out_of_bounds,
    trim_out_of_bounds,
    volume_to_freq,
};
