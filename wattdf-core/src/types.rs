//! Re-export of foundational types from `wattdf-types`.
// Consolidated re-exports so downstream crates can depend on `wattdf-core` only

pub use wattdf_types::{
    DEFAULT_COLUMN, Frequency, FrequencySpec, FrequencyUnit, MethodKind, Origin, ResampleConfig,
    TimeFrame, TimeSeries, WattError, ensure_strictly_increasing, validate_last_step,
};
