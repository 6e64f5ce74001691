pub mod error;
pub mod validate;

pub mod field;
pub mod codec;
pub mod layout;
pub mod store;
pub mod set;

pub use crate::codec::{Codec, CodecOptions, SAFE_WIDTH};
pub use crate::error::{CodecError, Result};
pub use crate::field::spec::{FieldSpec, MaxValue, SortOrder, UpdateMode};
pub use crate::set::{MultiFieldSet, SetError};
pub use crate::store::memory::MemoryStore;
