// crates/zfield-core/src/layout/mod.rs
//
// A layout is the persisted configuration of a codec: the field specs in
// declaration order plus the safe width they were validated against.

pub mod checksum;
pub mod defaults;
pub mod format;

use crate::codec::{Codec, CodecOptions, SAFE_WIDTH};
use crate::error::Result;
use crate::field::spec::FieldSpec;

pub const LAYOUT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub version: u16,
    pub safe_width: u8,
    pub fields: Vec<FieldSpec>,
}

impl Layout {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            version: LAYOUT_VERSION,
            safe_width: SAFE_WIDTH as u8,
            fields,
        }
    }

    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            safe_width: self.safe_width as u32,
        }
    }

    pub fn build_codec(&self) -> Result<Codec> {
        Codec::with_options(self.fields.clone(), self.options())
    }
}
