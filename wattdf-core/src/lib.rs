//! wattdf-core
//!
//! Resampling engine shared across the wattdf ecosystem.
//!
//! - `types`: re-exported containers, configuration, and errors from `wattdf-types`.
//! - `timeseries::index`: `index_to_freq`, the target-instant builder.
//! - `timeseries::interpolate`: piecewise-affine and piecewise-constant
//!   strategies and the `StrategyFn` contract they share.
//! - `timeseries::conservative`: `volume_to_freq` and `flow_rate_to_freq`.
//! - `timeseries::trim`: `trim_out_of_bounds` for resampled output.
//! - `timeseries::infer`: step inference, durations, and hole filling.
//!
//! Every operation is a synchronous, pure function of its inputs: sources
//! are borrowed, never mutated, and results are freshly allocated. The same
//! series can be resampled from several threads at once.
//!
#![warn(missing_docs)]

/// Time-series resampling: target grids, strategies, and trimming.
pub mod timeseries;
pub mod types;

pub use timeseries::conservative::{flow_rate_to_freq, volume_to_freq};
pub use timeseries::index::{MAX_TARGETS, grid_start, index_to_freq};
pub use timeseries::infer::{estimate_step, fill_data_holes, timestep_durations};
pub use timeseries::interpolate::{
    StrategyFn, StrategyOptions, check_inputs, piecewise_affine, piecewise_constant,
    pointwise_strategy,
};
pub use timeseries::trim::{trim_frame_out_of_bounds, trim_out_of_bounds};
pub use types::*;
