use std::collections::HashSet;

use crate::error::{CodecError, Result};
use crate::field::spec::FieldSpec;

pub const MIN_SAFE_WIDTH: u32 = 1;
pub const MAX_SAFE_WIDTH: u32 = u64::BITS;

pub fn validate_safe_width(safe_width: u32) -> Result<()> {
    if !(MIN_SAFE_WIDTH..=MAX_SAFE_WIDTH).contains(&safe_width) {
        return Err(CodecError::Config(format!(
            "safe_width must be in {}..={}, got {}",
            MIN_SAFE_WIDTH, MAX_SAFE_WIDTH, safe_width
        )));
    }
    Ok(())
}

pub fn validate_specs(specs: &[FieldSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(CodecError::Config("at least one field is required".into()));
    }

    let mut seen = HashSet::with_capacity(specs.len());
    for s in specs {
        if s.name.is_empty() {
            return Err(CodecError::Config("field name must be non-empty".into()));
        }
        if !seen.insert(s.name.as_str()) {
            return Err(CodecError::Config(format!("duplicate field name: {}", s.name)));
        }
    }

    // An unbounded field eats all headroom above the fields below it, so
    // nothing may sit above it.
    let mains: Vec<usize> = specs
        .iter()
        .enumerate()
        .filter(|(_, s)| s.max_value.is_unbounded())
        .map(|(i, _)| i)
        .collect();
    if mains.len() > 1 {
        return Err(CodecError::Config("at most one unbounded field is allowed".into()));
    }
    if let Some(&i) = mains.first() {
        if i != 0 {
            return Err(CodecError::Config(format!(
                "unbounded field {} must be declared first",
                specs[i].name
            )));
        }
    }

    Ok(())
}
