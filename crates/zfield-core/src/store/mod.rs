// crates/zfield-core/src/store/mod.rs
//
// Seam to the sorted-set store that owns the per-entity scores.
// The codec never orders anything itself; ranking and ranges come from here.

pub mod memory;

use std::error::Error as StdError;

/// A member with its packed score, as returned by range reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: String,
    pub score: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBound {
    Unbounded,
    Inclusive(u64),
    Exclusive(u64),
}

impl ScoreBound {
    /// True if `score` satisfies this bound used as a lower limit.
    pub fn admits_from_below(self, score: u64) -> bool {
        match self {
            ScoreBound::Unbounded => true,
            ScoreBound::Inclusive(b) => score >= b,
            ScoreBound::Exclusive(b) => score > b,
        }
    }

    /// True if `score` satisfies this bound used as an upper limit.
    pub fn admits_from_above(self, score: u64) -> bool {
        match self {
            ScoreBound::Unbounded => true,
            ScoreBound::Inclusive(b) => score <= b,
            ScoreBound::Exclusive(b) => score < b,
        }
    }
}

/// The two primitives the update cycle needs.
pub trait ScoreStore {
    type Error: StdError + Send + Sync + 'static;

    fn fetch_score(&self, member: &str) -> Result<Option<u64>, Self::Error>;

    fn store_score(&self, member: &str, score: u64) -> Result<(), Self::Error>;
}

/// Ordered reads, all in ascending score order (best entity first).
pub trait RankedScoreStore: ScoreStore {
    /// 0-based rank, or `None` if the member is absent.
    fn rank(&self, member: &str) -> Result<Option<u64>, Self::Error>;

    fn range(&self, offset: usize, limit: usize) -> Result<Vec<ScoredMember>, Self::Error>;

    fn range_by_score(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScoredMember>, Self::Error>;

    fn count_in_range(&self, min: ScoreBound, max: ScoreBound) -> Result<u64, Self::Error>;
}

/// Stores that can write conditionally on the value they currently hold.
pub trait AtomicScoreStore: ScoreStore {
    /// Write `score` only if the stored value still equals `expected`
    /// (`None` = member absent). Returns whether the write happened.
    fn compare_and_store(&self, member: &str, expected: Option<u64>, score: u64) -> Result<bool, Self::Error>;
}
