// crates/zfield-core/src/codec/present.rs
//
// Read-side view of a score: logical values with the Descending complement
// undone. Never feed these back into `pack`.

use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::error::Result;
use crate::field::spec::{MaxValue, SortOrder, UpdateMode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    pub value: u64,
}

/// Snapshot of one field's slot, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub sort: SortOrder,
    pub update: UpdateMode,
    pub max_value: MaxValue,
    pub bits: u32,
    pub shift: u32,
    pub mask: u64,
    pub is_main: bool,
    pub default_value: u64,
    pub position: usize,
    pub max_absolute: u64,
}

impl Codec {
    pub fn logical_values(&self, score: Option<u64>) -> Vec<FieldValue> {
        self.plans()
            .iter()
            .zip(self.unpack(score))
            .map(|(p, packed)| FieldValue {
                name: p.name().to_string(),
                value: p.to_logical(packed),
            })
            .collect()
    }

    pub fn logical_map(&self, score: Option<u64>) -> BTreeMap<String, u64> {
        self.logical_values(score)
            .into_iter()
            .map(|fv| (fv.name, fv.value))
            .collect()
    }

    pub fn logical_value(&self, name: &str, score: Option<u64>) -> Result<u64> {
        let plan = &self.plans()[self.index_of(name)?];
        let packed = match score {
            Some(z) => plan.extract(z),
            None => plan.default_value(),
        };
        Ok(plan.to_logical(packed))
    }

    pub fn fields_info(&self) -> Vec<FieldInfo> {
        self.plans()
            .iter()
            .map(|p| FieldInfo {
                name: p.name().to_string(),
                sort: p.sort(),
                update: p.update_mode(),
                max_value: p.spec().max_value,
                bits: p.bits(),
                shift: p.shift(),
                mask: p.mask(),
                is_main: p.is_main(),
                default_value: p.default_value(),
                position: p.position(),
                max_absolute: p.max_absolute(),
            })
            .collect()
    }
}
