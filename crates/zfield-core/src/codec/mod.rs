// crates/zfield-core/src/codec/mod.rs
//
// Ordered set of field slots packed into one u64 score.
//
// Widths are validated against `safe_width` (<= 64) at construction, so every
// packed score fits a u64 and, at the default width of 53, is exactly
// representable as an f64 score in a sorted-set store.

pub mod present;
pub mod update;

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::field::plan::FieldPlan;
use crate::field::spec::FieldSpec;
use crate::validate::{validate_safe_width, validate_specs};

/// Largest integer width an IEEE-754 double holds without loss.
pub const SAFE_WIDTH: u32 = 53;

/// 2^64 as f64.
const U64_LIMIT_F64: f64 = 18_446_744_073_709_551_616.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    pub safe_width: u32,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self { safe_width: SAFE_WIDTH }
    }
}

#[derive(Clone, Debug)]
pub struct Codec {
    /// Declaration order: index 0 is the most significant field.
    plans: Vec<FieldPlan>,
    safe_width: u32,
    default_score: u64,
}

impl Codec {
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        Self::with_options(specs, CodecOptions::default())
    }

    pub fn with_options(specs: Vec<FieldSpec>, opts: CodecOptions) -> Result<Self> {
        validate_safe_width(opts.safe_width)?;
        validate_specs(&specs)?;

        let safe_width = opts.safe_width;
        let mut plans = specs
            .into_iter()
            .map(|s| FieldPlan::new(s, safe_width))
            .collect::<Result<Vec<_>>>()?;

        let fixed_bits: u64 = plans.iter().filter(|p| !p.is_main()).map(|p| p.bits() as u64).sum();
        if fixed_bits > safe_width as u64 {
            return Err(CodecError::Config(format!(
                "fields need {} bits, safe width is {}",
                fixed_bits, safe_width
            )));
        }

        let n = plans.len();
        let mut shift: u32 = 0;
        for (position, plan) in plans.iter_mut().rev().enumerate() {
            plan.assign_offset(position, shift, safe_width)?;
            shift += plan.bits();
        }
        debug_assert_eq!(plans[0].position(), n - 1);

        let mut codec = Self {
            plans,
            safe_width,
            default_score: 0,
        };
        let defaults: Vec<u64> = codec.plans.iter().map(FieldPlan::default_value).collect();
        codec.default_score = codec.pack(&defaults)?;

        debug!(
            fields = n,
            total_bits = codec.total_bits(),
            safe_width,
            default_score = codec.default_score,
            "codec built"
        );
        Ok(codec)
    }

    #[inline]
    pub fn plans(&self) -> &[FieldPlan] {
        &self.plans
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    #[inline]
    pub fn safe_width(&self) -> u32 {
        self.safe_width
    }

    pub fn total_bits(&self) -> u32 {
        self.plans.iter().map(FieldPlan::bits).sum()
    }

    /// Score of an entity with every field at its default.
    #[inline]
    pub fn default_score(&self) -> u64 {
        self.default_score
    }

    pub fn field_plan(&self, name: &str) -> Option<&FieldPlan> {
        self.plans.iter().find(|p| p.name() == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
        self.plans
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }

    /// Combine packed per-field values (declaration order) into one score.
    ///
    /// Each value must fit its slot; an oversized value would otherwise bleed
    /// into the field above it.
    pub fn pack(&self, values: &[u64]) -> Result<u64> {
        if values.len() != self.plans.len() {
            return Err(CodecError::Config(format!(
                "pack: expected {} values, got {}",
                self.plans.len(),
                values.len()
            )));
        }

        let mut score: u64 = 0;
        for (plan, &v) in self.plans.iter().zip(values.iter()) {
            let v = plan.check_range(v as i128)?;
            score |= v << plan.shift();
        }
        Ok(score)
    }

    /// Split a score into packed per-field values (declaration order).
    /// An absent score yields each field's default.
    pub fn unpack(&self, score: Option<u64>) -> Vec<u64> {
        match score {
            Some(z) => self.plans.iter().map(|p| p.extract(z)).collect(),
            None => self.plans.iter().map(FieldPlan::default_value).collect(),
        }
    }

    /// `unpack` keyed by field name.
    pub fn unpack_named(&self, score: Option<u64>) -> Vec<(&str, u64)> {
        self.plans
            .iter()
            .zip(self.unpack(score))
            .map(|(p, v)| (p.name(), v))
            .collect()
    }

    /// Exact f64 form of a score, for stores that keep float scores.
    pub fn score_to_f64(&self, score: u64) -> Result<f64> {
        if self.safe_width < u64::BITS && score >> self.safe_width != 0 {
            return Err(CodecError::ScoreDomain(format!(
                "score {} wider than safe width {}",
                score, self.safe_width
            )));
        }
        let f = score as f64;
        // Values near u64::MAX round up to 2^64, which the cast back would saturate.
        if f >= U64_LIMIT_F64 || f as u64 != score {
            return Err(CodecError::ScoreDomain(format!("score {score} not exact as f64")));
        }
        Ok(f)
    }

    /// Inverse of `score_to_f64`; rejects anything that could not have come from it.
    pub fn score_from_f64(&self, f: f64) -> Result<u64> {
        if !f.is_finite() || f < 0.0 || f.fract() != 0.0 {
            return Err(CodecError::ScoreDomain(format!("not a packed score: {f}")));
        }
        if f >= U64_LIMIT_F64 {
            return Err(CodecError::ScoreDomain(format!("score {f} exceeds u64")));
        }
        let z = f as u64;
        if self.safe_width < u64::BITS && z >> self.safe_width != 0 {
            return Err(CodecError::ScoreDomain(format!(
                "score {} wider than safe width {}",
                z, self.safe_width
            )));
        }
        Ok(z)
    }
}
