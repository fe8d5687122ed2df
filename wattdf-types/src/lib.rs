//! Time-series containers, resampling configuration, and the error taxonomy
//! shared by the wattdf crates.
#![warn(missing_docs)]

mod config;
mod error;
mod frame;
mod frequency;
mod series;

pub use config::{MethodKind, Origin, ResampleConfig, validate_last_step};
pub use error::WattError;
pub use frame::{DEFAULT_COLUMN, TimeFrame};
pub use frequency::{Frequency, FrequencySpec, FrequencyUnit};
pub use series::{TimeSeries, ensure_strictly_increasing};
