// crates/zfield-core/src/codec/update.rs
//
// Pure half of the read-modify-write cycle. The caller fetches the current
// score, calls `apply_field_update`, and stores the result; nothing here
// touches a store.

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::field::spec::UpdateMode;

impl Codec {
    /// Apply `(field, amount)` updates to `current` (or the default score when
    /// absent) and return the new score.
    ///
    /// `amount` is logical: a positive amount on a Descending field moves it
    /// toward the top, which lowers its packed value. Replace is measured from
    /// the field default, so it means "set the logical value to `amount`".
    ///
    /// Any unknown field, repeated field or out-of-range result fails the
    /// whole call.
    pub fn apply_field_update<'u, I>(&self, current: Option<u64>, updates: I) -> Result<u64>
    where
        I: IntoIterator<Item = (&'u str, i64)>,
    {
        let mut values = self.unpack(current);
        let mut touched = vec![false; values.len()];

        for (name, amount) in updates {
            let idx = self.index_of(name)?;
            if touched[idx] {
                return Err(CodecError::DuplicateUpdate(name.to_string()));
            }
            touched[idx] = true;

            let plan = &self.plans()[idx];
            let delta = amount as i128 * plan.multiplier();
            let next = match plan.update_mode() {
                UpdateMode::Incremental => values[idx] as i128 + delta,
                UpdateMode::Replace => plan.default_value() as i128 + delta,
            };
            values[idx] = plan.check_range(next)?;
        }

        self.pack(&values)
    }

    /// Score with each named field set to `limit` (logical) and every other
    /// field at its default. Useful as a bound for score-range queries.
    pub fn max_score_with_fields<'u, I>(&self, limits: I) -> Result<u64>
    where
        I: IntoIterator<Item = (&'u str, i64)>,
    {
        let mut values = self.unpack(None);
        for (name, limit) in limits {
            let idx = self.index_of(name)?;
            let plan = &self.plans()[idx];
            let v = plan.default_value() as i128 + limit as i128 * plan.multiplier();
            values[idx] = plan.check_range(v)?;
        }
        self.pack(&values)
    }
}
