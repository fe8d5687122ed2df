//! Time-series resampling engine.
//!
//! Modules include:
//! - `calendar`: timezone-aware floor/ceil/step arithmetic on instants
//! - `index`: target-instant construction (`index_to_freq`)
//! - `interpolate`: pointwise strategies and the strategy contract
//! - `conservative`: volume- and flow-rate-conservative resampling
//! - `trim`: out-of-bounds trimming of resampled output
//! - `infer`: step inference, timestep durations, and hole filling
/// Calendar arithmetic in the series timezone.
pub mod calendar;
/// Conservative strategies building their own interval grid.
pub mod conservative;
/// Target-instant construction.
pub mod index;
/// Step inference and regularization helpers.
pub mod infer;
/// Pointwise interpolation strategies.
pub mod interpolate;
/// Out-of-bounds trimming.
pub mod trim;
