// crates/zfield-core/src/field/plan.rs
//
// Bit slot of one field inside the combined score.
//
// Slots are laid out MSB-first in declaration order: the last-declared field
// sits at shift 0, each earlier field sits directly above the one after it.
// Descending fields store `max_absolute - logical`, so ascending numeric order
// of the score is descending logical order for that field.

use crate::error::{CodecError, Result};
use crate::field::spec::{FieldSpec, MaxValue, SortOrder, UpdateMode};

/// Number of bits needed to represent `n` (at least 1).
#[inline]
pub fn bit_count(n: u64) -> u32 {
    if n == 0 {
        return 1;
    }
    u64::BITS - n.leading_zeros()
}

/// All-ones value of `bits` width.
#[inline]
pub fn max_bin(bits: u32) -> u64 {
    match bits {
        0 => 0,
        b if b >= u64::BITS => u64::MAX,
        b => (1u64 << b) - 1,
    }
}

#[derive(Clone, Debug)]
pub struct FieldPlan {
    pub(crate) spec: FieldSpec,
    pub(crate) bits: u32,
    pub(crate) position: usize,
    pub(crate) shift: u32,
    pub(crate) mask: u64,
    pub(crate) max_absolute: u64,
    pub(crate) is_main: bool,
}

impl FieldPlan {
    /// Derive the unshifted slot for `spec`. An unbounded field provisionally
    /// takes the full `safe_width` until `assign_offset` trims it.
    pub fn new(spec: FieldSpec, safe_width: u32) -> Result<Self> {
        let (bits, is_main) = match spec.max_value {
            MaxValue::Unbounded => (safe_width, true),
            MaxValue::Finite(max) if max < 0 => {
                return Err(CodecError::Config(format!(
                    "field {}: max value must be non-negative, got {}",
                    spec.name, max
                )));
            }
            MaxValue::Finite(max) => (bit_count(max as u64), false),
        };

        let mask = max_bin(bits);
        Ok(Self {
            spec,
            bits,
            position: 0,
            shift: 0,
            mask,
            max_absolute: mask,
            is_main,
        })
    }

    /// Place the slot at `shift`. A main field shrinks to the headroom left
    /// between `shift` and `safe_width`.
    pub fn assign_offset(&mut self, position: usize, shift: u32, safe_width: u32) -> Result<()> {
        self.position = position;
        self.shift = shift;

        if self.is_main {
            if shift >= safe_width {
                return Err(CodecError::Config(format!(
                    "field {}: no headroom left for main field (shift={} safe_width={})",
                    self.spec.name, shift, safe_width
                )));
            }
            self.bits = safe_width - shift;
            self.max_absolute = max_bin(self.bits);
        } else if shift + self.bits > safe_width {
            return Err(CodecError::Config(format!(
                "field {}: slot {}..{} exceeds safe width {}",
                self.spec.name,
                shift,
                shift + self.bits,
                safe_width
            )));
        }

        self.mask = max_bin(self.bits) << shift;
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    #[inline]
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    #[inline]
    pub fn sort(&self) -> SortOrder {
        self.spec.sort
    }

    #[inline]
    pub fn update_mode(&self) -> UpdateMode {
        self.spec.update
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    #[inline]
    pub fn max_absolute(&self) -> u64 {
        self.max_absolute
    }

    #[inline]
    pub fn is_main(&self) -> bool {
        self.is_main
    }

    #[inline]
    pub fn multiplier(&self) -> i128 {
        self.spec.sort.multiplier()
    }

    /// Packed value of an untouched entity: worst rank for either direction.
    #[inline]
    pub fn default_value(&self) -> u64 {
        match self.spec.sort {
            SortOrder::Ascending => 0,
            SortOrder::Descending => self.max_absolute,
        }
    }

    /// Packed slot value of `score`.
    #[inline]
    pub fn extract(&self, score: u64) -> u64 {
        (score & self.mask) >> self.shift
    }

    /// Undo the complement for presentation.
    #[inline]
    pub fn to_logical(&self, packed: u64) -> u64 {
        match self.spec.sort {
            SortOrder::Ascending => packed,
            SortOrder::Descending => self.max_absolute.saturating_sub(packed),
        }
    }

    pub(crate) fn check_range(&self, value: i128) -> Result<u64> {
        if value < 0 || value > self.max_absolute as i128 {
            return Err(CodecError::OutOfRange {
                field: self.spec.name.clone(),
                value,
                max: self.max_absolute,
            });
        }
        Ok(value as u64)
    }
}
