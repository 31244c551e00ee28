//! Axis descriptions: name, unit and the running data range of one dimension

use serde::{Deserialize, Serialize};

/// Range tracker for one dataset dimension
///
/// An axis starts out undefined (`min` and `max` are NaN) and grows as values
/// are added. NaN samples are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescription {
    /// Axis name (e.g. "x", "time")
    pub name: String,

    /// Physical unit (e.g. "s", "Hz")
    pub unit: Option<String>,

    /// Smallest value seen
    pub min: f64,

    /// Largest value seen
    pub max: f64,
}

impl AxisDescription {
    /// Create an undefined axis with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Default axis for a dimension index: x, y, z, then dim3, dim4, ...
    pub fn for_dimension(dim: usize) -> Self {
        match dim {
            0 => Self::new("x"),
            1 => Self::new("y"),
            2 => Self::new("z"),
            n => Self::new(format!("dim{}", n)),
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Whether both limits hold a number
    pub fn is_defined(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan()
    }

    /// Widen the range to include `value`.
    ///
    /// Returns true if the range changed.
    pub fn add(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        if !self.is_defined() {
            self.min = value;
            self.max = value;
            return true;
        }
        let mut changed = false;
        if value < self.min {
            self.min = value;
            changed = true;
        }
        if value > self.max {
            self.max = value;
            changed = true;
        }
        changed
    }

    /// Widen the range to include every value of `values`
    pub fn add_all(&mut self, values: &[f64]) -> bool {
        values.iter().fold(false, |changed, &v| self.add(v) | changed)
    }

    /// Replace both limits
    pub fn set(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Reset to the undefined state, keeping name and unit
    pub fn clear(&mut self) {
        self.min = f64::NAN;
        self.max = f64::NAN;
    }

    /// Span of the range (NaN when undefined)
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    /// Check if `value` lies within the range
    pub fn contains(&self, value: f64) -> bool {
        self.is_defined() && value >= self.min && value <= self.max
    }

    /// Get the full label with unit
    pub fn full_label(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} [{}]", self.name, unit),
            None => self.name.clone(),
        }
    }
}

impl Default for AxisDescription {
    fn default() -> Self {
        Self::new("")
    }
}
