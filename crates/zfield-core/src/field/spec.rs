// crates/zfield-core/src/field/spec.rs

use crate::error::{CodecError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smaller values rank first.
    Ascending,
    /// Larger values rank first (stored as a complement).
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn multiplier(self) -> i128 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateMode {
    /// Add the amount to the current value.
    Incremental,
    /// Overwrite the value, measured from the field default.
    Replace,
}

impl UpdateMode {
    pub fn name(self) -> &'static str {
        match self {
            UpdateMode::Incremental => "INCREMENTAL",
            UpdateMode::Replace => "REPLACE",
        }
    }
}

/// Declared upper bound of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaxValue {
    Finite(i64),
    /// Consume whatever headroom is left above the other fields.
    Unbounded,
}

impl MaxValue {
    /// Float-style declaration: `+inf` is unbounded, finite values keep their integer part.
    pub fn from_f64(v: f64) -> Result<Self> {
        if v.is_nan() {
            return Err(CodecError::Config("max value must not be NaN".into()));
        }
        if v == f64::INFINITY {
            return Ok(MaxValue::Unbounded);
        }
        if v < 0.0 {
            return Err(CodecError::Config(format!("max value must be non-negative, got {v}")));
        }
        if v >= i64::MAX as f64 {
            return Err(CodecError::Config(format!("max value too large: {v}")));
        }
        Ok(MaxValue::Finite(v.trunc() as i64))
    }

    #[inline]
    pub fn is_unbounded(self) -> bool {
        matches!(self, MaxValue::Unbounded)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub sort: SortOrder,
    pub max_value: MaxValue,
    pub update: UpdateMode,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, sort: SortOrder, max_value: MaxValue, update: UpdateMode) -> Self {
        Self {
            name: name.into(),
            sort,
            max_value,
            update,
        }
    }

    pub fn ascending(name: impl Into<String>, max: i64) -> Self {
        Self::new(name, SortOrder::Ascending, MaxValue::Finite(max), UpdateMode::Incremental)
    }

    pub fn descending(name: impl Into<String>, max: i64) -> Self {
        Self::new(name, SortOrder::Descending, MaxValue::Finite(max), UpdateMode::Incremental)
    }

    pub fn with_update(mut self, update: UpdateMode) -> Self {
        self.update = update;
        self
    }
}
