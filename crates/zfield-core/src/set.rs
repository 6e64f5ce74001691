// crates/zfield-core/src/set.rs
//
// Read-modify-write driver: fetch score -> Codec::apply_field_update -> store.
//
// `increase_scores` is a plain read-then-write. Two concurrent calls for the
// same member can lose one update (last writer wins). Stores with a
// compare-and-set primitive can use `increase_scores_atomic`, which re-runs
// the fetch on every conflict. Store errors are passed through untouched.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::present::{FieldInfo, FieldValue};
use crate::codec::Codec;
use crate::error::CodecError;
use crate::store::{AtomicScoreStore, RankedScoreStore, ScoreBound, ScoreStore, ScoredMember};

#[derive(Debug, Error)]
pub enum SetError<E: StdError + 'static> {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("store error: {0}")]
    Store(#[source] E),

    #[error("update of {member} still conflicting after {attempts} attempts")]
    Contended { member: String, attempts: u32 },
}

/// A member with its logical field values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberScores {
    pub member: String,
    pub score: u64,
    pub fields: Vec<FieldValue>,
}

pub struct MultiFieldSet<S> {
    codec: Arc<Codec>,
    store: S,
}

impl<S: ScoreStore> MultiFieldSet<S> {
    pub fn new(codec: Arc<Codec>, store: S) -> Self {
        Self { codec, store }
    }

    #[inline]
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fields_info(&self) -> Vec<FieldInfo> {
        self.codec.fields_info()
    }

    /// Apply `updates` to `member` and return the score that was written.
    pub fn increase_scores(&self, member: &str, updates: &[(&str, i64)]) -> Result<u64, SetError<S::Error>> {
        let current = self.store.fetch_score(member).map_err(SetError::Store)?;
        let next = self.codec.apply_field_update(current, updates.iter().copied())?;
        self.store.store_score(member, next).map_err(SetError::Store)?;

        debug!(member, ?current, next, "scores updated");
        Ok(next)
    }

    /// Logical values of every field; an absent member reads all defaults.
    pub fn get_scores(&self, member: &str) -> Result<Vec<FieldValue>, SetError<S::Error>> {
        let score = self.store.fetch_score(member).map_err(SetError::Store)?;
        Ok(self.codec.logical_values(score))
    }

    pub fn get_score_map(&self, member: &str) -> Result<BTreeMap<String, u64>, SetError<S::Error>> {
        let score = self.store.fetch_score(member).map_err(SetError::Store)?;
        Ok(self.codec.logical_map(score))
    }

    pub fn get_score_for_field(&self, field: &str, member: &str) -> Result<u64, SetError<S::Error>> {
        if self.codec.field_plan(field).is_none() {
            return Err(CodecError::UnknownField(field.to_string()).into());
        }
        let score = self.store.fetch_score(member).map_err(SetError::Store)?;
        Ok(self.codec.logical_value(field, score)?)
    }

    pub fn reset_member(&self, member: &str) -> Result<(), SetError<S::Error>> {
        let z = self.codec.default_score();
        self.store.store_score(member, z).map_err(SetError::Store)?;
        debug!(member, score = z, "member reset");
        Ok(())
    }

    pub fn max_score_with_fields(&self, limits: &[(&str, i64)]) -> Result<u64, SetError<S::Error>> {
        Ok(self.codec.max_score_with_fields(limits.iter().copied())?)
    }

    fn present(&self, rows: Vec<ScoredMember>) -> Vec<MemberScores> {
        rows.into_iter()
            .map(|r| MemberScores {
                fields: self.codec.logical_values(Some(r.score)),
                member: r.member,
                score: r.score,
            })
            .collect()
    }
}

impl<S: RankedScoreStore> MultiFieldSet<S> {
    pub fn get_rank(&self, member: &str) -> Result<Option<u64>, SetError<S::Error>> {
        self.store.rank(member).map_err(SetError::Store)
    }

    pub fn get_members(&self, offset: usize, limit: usize) -> Result<Vec<MemberScores>, SetError<S::Error>> {
        let rows = self.store.range(offset, limit).map_err(SetError::Store)?;
        Ok(self.present(rows))
    }

    pub fn get_top_members(&self, limit: usize) -> Result<Vec<MemberScores>, SetError<S::Error>> {
        self.get_members(0, limit)
    }

    pub fn get_members_in_range(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<MemberScores>, SetError<S::Error>> {
        let rows = self
            .store
            .range_by_score(min, max, offset, limit)
            .map_err(SetError::Store)?;
        Ok(self.present(rows))
    }

    pub fn count_in_range(&self, min: ScoreBound, max: ScoreBound) -> Result<u64, SetError<S::Error>> {
        self.store.count_in_range(min, max).map_err(SetError::Store)
    }
}

impl<S: AtomicScoreStore> MultiFieldSet<S> {
    /// Like `increase_scores`, but writes with compare-and-set and retries
    /// from a fresh fetch on conflict, up to `max_attempts` times.
    /// `max_attempts` must be at least 1.
    pub fn increase_scores_atomic(
        &self,
        member: &str,
        updates: &[(&str, i64)],
        max_attempts: u32,
    ) -> Result<u64, SetError<S::Error>> {
        if max_attempts == 0 {
            return Err(CodecError::Config("max_attempts must be at least 1".into()).into());
        }

        for attempt in 1..=max_attempts {
            let current = self.store.fetch_score(member).map_err(SetError::Store)?;
            let next = self.codec.apply_field_update(current, updates.iter().copied())?;

            if self
                .store
                .compare_and_store(member, current, next)
                .map_err(SetError::Store)?
            {
                debug!(member, ?current, next, attempt, "scores updated");
                return Ok(next);
            }
            warn!(member, attempt, "score changed underneath update; retrying");
        }

        Err(SetError::Contended {
            member: member.to_string(),
            attempts: max_attempts,
        })
    }
}
