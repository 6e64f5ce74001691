// crates/zfield-core/src/field/mod.rs

pub mod plan;
pub mod spec;
