// crates/zfield-core/src/layout/format.rs

use std::path::Path;

use crate::error::{CodecError, Result};
use crate::field::spec::{FieldSpec, MaxValue, SortOrder, UpdateMode};
use crate::layout::checksum::{seal, unseal, TRAILER_LEN};
use crate::layout::Layout;

const MAGIC: &[u8; 4] = b"ZML1";

const MAX_FINITE: u8 = 0;
const MAX_UNBOUNDED: u8 = 1;

/// Binary-stable layout format.
/// Layout (little-endian):
/// MAGIC[4]
/// version:u16
/// safe_width:u8
/// field_count:u16
/// fields: repeated {
///   name_len:u16 name:[u8; name_len] (utf8)
///   sort:u8         (0=asc 1=desc)
///   update:u8       (0=incremental 1=replace)
///   max_kind:u8     (0=finite 1=unbounded)
///   [finite] max:i64
/// }
/// trailer (see `checksum`): crc32:u32 blake3_16:[16]
pub fn encode(layout: &Layout) -> Result<Vec<u8>> {
    let mut b = Vec::with_capacity(64 + layout.fields.len() * 24);
    b.extend_from_slice(MAGIC);
    b.extend_from_slice(&layout.version.to_le_bytes());
    b.push(layout.safe_width);

    let count = u16::try_from(layout.fields.len())
        .map_err(|_| CodecError::LayoutFormat(format!("too many fields: {}", layout.fields.len())))?;
    b.extend_from_slice(&count.to_le_bytes());

    for f in &layout.fields {
        let name = f.name.as_bytes();
        let name_len = u16::try_from(name.len())
            .map_err(|_| CodecError::LayoutFormat(format!("field name too long: {} bytes", name.len())))?;
        b.extend_from_slice(&name_len.to_le_bytes());
        b.extend_from_slice(name);

        b.push(match f.sort {
            SortOrder::Ascending => 0,
            SortOrder::Descending => 1,
        });
        b.push(match f.update {
            UpdateMode::Incremental => 0,
            UpdateMode::Replace => 1,
        });
        match f.max_value {
            MaxValue::Finite(max) => {
                b.push(MAX_FINITE);
                b.extend_from_slice(&max.to_le_bytes());
            }
            MaxValue::Unbounded => b.push(MAX_UNBOUNDED),
        }
    }

    seal(&mut b);
    Ok(b)
}

pub fn decode(bytes: &[u8]) -> Result<Layout> {
    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(CodecError::LayoutFormat("bad magic".into()));
    }
    let bytes = unseal(bytes)?;
    let mut i = MAGIC.len();

    let version = read_u16(bytes, &mut i)?;
    if version == 0 || version > super::LAYOUT_VERSION {
        return Err(CodecError::LayoutFormat(format!("unsupported version {version}")));
    }
    let safe_width = read_u8(bytes, &mut i)?;

    let count = read_u16(bytes, &mut i)? as usize;
    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        let name_len = read_u16(bytes, &mut i)? as usize;
        need(bytes, i, name_len)?;
        let name = std::str::from_utf8(&bytes[i..i + name_len])
            .map_err(|_| CodecError::LayoutFormat("field name is not utf8".into()))?
            .to_string();
        i += name_len;

        let sort = match read_u8(bytes, &mut i)? {
            0 => SortOrder::Ascending,
            1 => SortOrder::Descending,
            v => return Err(CodecError::LayoutFormat(format!("unknown sort order {v}"))),
        };
        let update = match read_u8(bytes, &mut i)? {
            0 => UpdateMode::Incremental,
            1 => UpdateMode::Replace,
            v => return Err(CodecError::LayoutFormat(format!("unknown update mode {v}"))),
        };
        let max_value = match read_u8(bytes, &mut i)? {
            MAX_FINITE => MaxValue::Finite(read_i64(bytes, &mut i)?),
            MAX_UNBOUNDED => MaxValue::Unbounded,
            v => return Err(CodecError::LayoutFormat(format!("unknown max kind {v}"))),
        };

        fields.push(FieldSpec {
            name,
            sort,
            max_value,
            update,
        });
    }

    if i != bytes.len() {
        return Err(CodecError::LayoutFormat(format!("{} trailing bytes", bytes.len() - i)));
    }

    Ok(Layout {
        version,
        safe_width,
        fields,
    })
}

pub fn read_file(path: impl AsRef<Path>) -> Result<Layout> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

pub fn write_file(path: impl AsRef<Path>, layout: &Layout) -> Result<()> {
    std::fs::write(path, encode(layout)?)?;
    Ok(())
}

/// Stable layout identifier: the trailing blake3_16 that `encode()` appends.
/// Two codecs built from layouts with the same id pack scores identically.
pub fn layout_id_16(layout: &Layout) -> Result<[u8; 16]> {
    let enc = encode(layout)?;
    layout_id_16_from_encoded(&enc)
}

pub fn layout_id_hex(layout: &Layout) -> Result<String> {
    Ok(hex16(&layout_id_16(layout)?))
}

pub fn layout_id_16_from_encoded(encoded: &[u8]) -> Result<[u8; 16]> {
    if encoded.len() < TRAILER_LEN {
        return Err(CodecError::LayoutFormat("encoded layout too small for id".into()));
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(&encoded[encoded.len() - 16..]);
    Ok(out)
}

fn hex16(id: &[u8; 16]) -> String {
    id.iter().map(|b| format!("{b:02x}")).collect()
}

fn need(bytes: &[u8], i: usize, n: usize) -> Result<()> {
    match i.checked_add(n) {
        Some(end) if end <= bytes.len() => Ok(()),
        _ => Err(CodecError::LayoutFormat(format!("unexpected eof at byte {i}"))),
    }
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8> {
    need(bytes, *i, 1)?;
    let v = bytes[*i];
    *i += 1;
    Ok(v)
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    need(bytes, *i, 2)?;
    let mut a = [0u8; 2];
    a.copy_from_slice(&bytes[*i..*i + 2]);
    *i += 2;
    Ok(u16::from_le_bytes(a))
}

fn read_i64(bytes: &[u8], i: &mut usize) -> Result<i64> {
    need(bytes, *i, 8)?;
    let mut a = [0u8; 8];
    a.copy_from_slice(&bytes[*i..*i + 8]);
    *i += 8;
    Ok(i64::from_le_bytes(a))
}
