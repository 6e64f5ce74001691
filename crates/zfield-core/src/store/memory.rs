// crates/zfield-core/src/store/memory.rs
//
// In-process sorted set: members ordered by (score, member), like a Redis zset.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::store::{AtomicScoreStore, RankedScoreStore, ScoreBound, ScoreStore, ScoredMember};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("memory store lock poisoned")]
    Poisoned,
}

#[derive(Default, Debug)]
struct Inner {
    scores: HashMap<String, u64>,
    ordered: BTreeSet<(u64, String)>,
}

impl Inner {
    fn put(&mut self, member: &str, score: u64) {
        if let Some(old) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(old, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }
}

#[derive(Default, Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, MemoryStoreError> {
        Ok(self.read()?.scores.len())
    }

    pub fn is_empty(&self) -> Result<bool, MemoryStoreError> {
        Ok(self.len()? == 0)
    }

    pub fn remove(&self, member: &str) -> Result<bool, MemoryStoreError> {
        let mut g = self.write()?;
        match g.scores.remove(member) {
            Some(old) => {
                g.ordered.remove(&(old, member.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, MemoryStoreError> {
        self.inner.read().map_err(|_| MemoryStoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, MemoryStoreError> {
        self.inner.write().map_err(|_| MemoryStoreError::Poisoned)
    }
}

impl ScoreStore for MemoryStore {
    type Error = MemoryStoreError;

    fn fetch_score(&self, member: &str) -> Result<Option<u64>, Self::Error> {
        Ok(self.read()?.scores.get(member).copied())
    }

    fn store_score(&self, member: &str, score: u64) -> Result<(), Self::Error> {
        self.write()?.put(member, score);
        Ok(())
    }
}

impl RankedScoreStore for MemoryStore {
    fn rank(&self, member: &str) -> Result<Option<u64>, Self::Error> {
        let g = self.read()?;
        let Some(&score) = g.scores.get(member) else {
            return Ok(None);
        };
        let key = (score, member.to_string());
        Ok(Some(g.ordered.range(..key).count() as u64))
    }

    fn range(&self, offset: usize, limit: usize) -> Result<Vec<ScoredMember>, Self::Error> {
        let g = self.read()?;
        Ok(g.ordered
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(score, member)| ScoredMember {
                member: member.clone(),
                score: *score,
            })
            .collect())
    }

    fn range_by_score(
        &self,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScoredMember>, Self::Error> {
        let g = self.read()?;
        Ok(g.ordered
            .iter()
            .skip_while(|(s, _)| !min.admits_from_below(*s))
            .take_while(|(s, _)| max.admits_from_above(*s))
            .skip(offset)
            .take(limit)
            .map(|(score, member)| ScoredMember {
                member: member.clone(),
                score: *score,
            })
            .collect())
    }

    fn count_in_range(&self, min: ScoreBound, max: ScoreBound) -> Result<u64, Self::Error> {
        let g = self.read()?;
        Ok(g.ordered
            .iter()
            .skip_while(|(s, _)| !min.admits_from_below(*s))
            .take_while(|(s, _)| max.admits_from_above(*s))
            .count() as u64)
    }
}

impl AtomicScoreStore for MemoryStore {
    fn compare_and_store(&self, member: &str, expected: Option<u64>, score: u64) -> Result<bool, Self::Error> {
        let mut g = self.write()?;
        if g.scores.get(member).copied() != expected {
            return Ok(false);
        }
        g.put(member, score);
        Ok(true)
    }
}
