//! Multi-column table sharing one instant index.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::series::ensure_strictly_increasing;
use crate::{TimeSeries, WattError};

/// Column name given to an unnamed series converted into a frame.
pub const DEFAULT_COLUMN: &str = "value";

/// Several aligned nullable columns over a single strictly increasing index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "TimeFrameRepr", into = "TimeFrameRepr")]
pub struct TimeFrame {
    instants: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
    index_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct TimeFrameRepr {
    instants: Vec<DateTime<Utc>>,
    #[serde(default)]
    columns: BTreeMap<String, Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_name: Option<String>,
}

impl TryFrom<TimeFrameRepr> for TimeFrame {
    type Error = WattError;

    fn try_from(r: TimeFrameRepr) -> Result<Self, Self::Error> {
        let mut frame = Self::new(r.instants)?;
        for (name, values) in r.columns {
            frame = frame.with_column(name, values)?;
        }
        frame.index_name = r.index_name;
        Ok(frame)
    }
}

impl From<TimeFrame> for TimeFrameRepr {
    fn from(f: TimeFrame) -> Self {
        Self {
            instants: f.instants,
            columns: f.columns,
            index_name: f.index_name,
        }
    }
}

impl TimeFrame {
    /// Build an empty-columned frame over `instants`.
    ///
    /// # Errors
    /// Returns `WattError::InvalidTimeseries` if instants are not strictly increasing.
    pub fn new(instants: Vec<DateTime<Utc>>) -> Result<Self, WattError> {
        ensure_strictly_increasing(&instants, "frame")?;
        Ok(Self {
            instants,
            columns: BTreeMap::new(),
            index_name: None,
        })
    }

    /// Add or replace a column.
    ///
    /// # Errors
    /// Returns `WattError::InvalidArg` if `values` is not aligned with the index.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, WattError> {
        let name = name.into();
        if values.len() != self.instants.len() {
            return Err(WattError::InvalidArg(format!(
                "column {name} has {} values for {} instants",
                values.len(),
                self.instants.len()
            )));
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    /// Set the index label.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Shared index.
    #[must_use]
    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    /// Index label.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Column values by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// True if the frame has no row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// Overwrite every cell of `column` whose instant satisfies `outside`.
    ///
    /// # Errors
    /// Returns `WattError::InvalidArg` if the column does not exist.
    pub fn fill_where<F>(&mut self, column: &str, value: Option<f64>, outside: F) -> Result<(), WattError>
    where
        F: Fn(DateTime<Utc>) -> bool,
    {
        let cells = self
            .columns
            .get_mut(column)
            .ok_or_else(|| WattError::InvalidArg(format!("unknown column: {column}")))?;
        for (cell, &ts) in cells.iter_mut().zip(&self.instants) {
            if outside(ts) {
                *cell = value;
            }
        }
        Ok(())
    }
}

impl From<TimeSeries> for TimeFrame {
    fn from(series: TimeSeries) -> Self {
        let column = series.name().unwrap_or(DEFAULT_COLUMN).to_string();
        let index_name = series.index_name().map(str::to_string);
        let (instants, values) = series.into_parts();
        let mut columns = BTreeMap::new();
        columns.insert(column, values);
        Self {
            instants,
            columns,
            index_name,
        }
    }
}
