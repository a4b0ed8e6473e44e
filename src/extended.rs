//! Extended header: typed keyword records.
//!
//! The extended header starts on a 512-byte block boundary
//! (`ext_start × 512`) and is `ext_size` bytes long. It may sit before or
//! after the data section. It holds back-to-back records:
//!
//! ```text
//! [0x00] lkey      i32   total record length in bytes
//! [0x04] lext      i16   record length not taken by the value
//! [0x06] ltag      i8    tag string length
//! [0x07] type      u8    value type code
//! [0x08] value     lkey - lext bytes
//! [0x08 + lkey - lext]
//!        tag       ltag bytes
//! ```
//! followed by padding up to `lkey`. Numbers use the header byte order.
//!
//! | Code | Value | Rendered as |
//! |------|-------|-------------|
//! | `A`  | ASCII text  | the text |
//! | `B`  | `i8`  | decimal |
//! | `I`  | `i16` | decimal |
//! | `L`  | `i32` | decimal |
//! | `X`  | `i64` | decimal |
//! | `F`  | `f32` | six fractional digits |
//! | `D`  | `f64` | six fractional digits |
//!
//! Numeric values must fit in `lkey - lext`; only the first is rendered.
//! Infinities render as `+Inf` / `-Inf`.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::endian::Endian;
use crate::utils::{ByteCursor, fill_at, text};
use crate::{Error, Result};

/// Length of the fixed record preamble.
pub const PREAMBLE_SIZE: usize = 8;

/// Extended header block size.
pub const BLOCK_SIZE: u64 = 512;

/// Read and decode the extended header of a Blue File.
pub fn read_extended_header<R: Read + Seek>(
    r: &mut R,
    endian: Endian,
    ext_start: u32,
    ext_size: u32,
) -> Result<BTreeMap<String, String>> {
    let offset = ext_start as u64 * BLOCK_SIZE;
    debug!("extended header at {offset}, {ext_size} bytes");
    if ext_size == 0 {
        return Ok(BTreeMap::new());
    }

    // Size the buffer against the source, not the declared size alone.
    let available = r.seek(SeekFrom::End(0))?.saturating_sub(offset);
    let mut buf = vec![0u8; available.min(ext_size as u64) as usize];
    let found = fill_at(r, offset, &mut buf)?;
    if found < ext_size as usize {
        return Err(Error::TruncatedExtendedHeader {
            expected: ext_size,
            found,
        });
    }

    parse_extended_header(&buf, endian)
}

/// Decode an in-memory extended header.
///
/// The walk must land exactly on `buf.len()`.
pub fn parse_extended_header(buf: &[u8], endian: Endian) -> Result<BTreeMap<String, String>> {
    let size = buf.len();
    let mut map = BTreeMap::new();
    let mut pos = 0;
    while pos < size {
        let (lkey, tag, value) = parse_record(buf, pos, endian)?;
        trace!("record at {pos}: {tag} = {value}");
        map.insert(tag, value);
        pos += lkey;
    }
    debug!("decoded {} extended keywords", map.len());
    Ok(map)
}

/// Value type named by a record's type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Ascii,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ValueKind {
    fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            b'A' => ValueKind::Ascii,
            b'B' => ValueKind::Int8,
            b'I' => ValueKind::Int16,
            b'L' => ValueKind::Int32,
            b'X' => ValueKind::Int64,
            b'F' => ValueKind::Float32,
            b'D' => ValueKind::Float64,
            _ => return None,
        })
    }

    /// Bytes taken by one numeric value; `None` for text.
    fn width(self) -> Option<usize> {
        match self {
            ValueKind::Ascii => None,
            ValueKind::Int8 => Some(1),
            ValueKind::Int16 => Some(2),
            ValueKind::Int32 | ValueKind::Float32 => Some(4),
            ValueKind::Int64 | ValueKind::Float64 => Some(8),
        }
    }
}

/// Decode the record at `pos`, returning its length, tag and rendered value.
fn parse_record(buf: &[u8], pos: usize, endian: Endian) -> Result<(usize, String, String)> {
    let trailing = || Error::TrailingBytes {
        offset: pos,
        size: buf.len() as u32,
    };
    let malformed = |reason: &'static str| Error::MalformedRecord {
        offset: pos,
        reason,
    };

    let preamble = buf.get(pos..pos + PREAMBLE_SIZE).ok_or_else(trailing)?;
    let mut c = ByteCursor::new(preamble, pos, endian);
    let lkey = c.i32("record length")?;
    let lext = c.i16("extra length")?;
    let ltag = c.i8("tag length")?;
    let code = c.u8("type code")?;

    let kind =
        ValueKind::from_code(code).ok_or(Error::UnknownKeywordType { offset: pos, code })?;

    if lkey <= 0 {
        return Err(malformed("non-positive record length"));
    }
    let lkey = lkey as usize;
    let record = pos
        .checked_add(lkey)
        .and_then(|end| buf.get(pos..end))
        .ok_or_else(trailing)?;

    let value_len = usize::try_from(lkey as i64 - lext as i64)
        .map_err(|_| malformed("extra length exceeds record length"))?;
    let tag_len = usize::try_from(ltag).map_err(|_| malformed("negative tag length"))?;
    if kind.width().is_some_and(|w| w > value_len) {
        return Err(malformed("value wider than payload"));
    }

    let mut c = ByteCursor::new(record, pos, endian);
    c.seek(PREAMBLE_SIZE, "record shorter than preamble")?;
    let value = render_value(&mut c, kind, value_len)?;

    c.seek(PREAMBLE_SIZE + value_len, "value runs past record")?;
    let tag = text(c.take(tag_len, "tag runs past record")?);

    Ok((lkey, tag, value))
}

/// Render the value at the cursor.
fn render_value(c: &mut ByteCursor<'_>, kind: ValueKind, value_len: usize) -> Result<String> {
    const SHORT: &str = "value runs past record";
    let value = match kind {
        ValueKind::Ascii => text(c.take(value_len, SHORT)?),
        ValueKind::Int8 => c.i8(SHORT)?.to_string(),
        ValueKind::Int16 => c.i16(SHORT)?.to_string(),
        ValueKind::Int32 => c.i32(SHORT)?.to_string(),
        ValueKind::Int64 => c.i64(SHORT)?.to_string(),
        ValueKind::Float32 => fixed6(c.f32(SHORT)? as f64),
        ValueKind::Float64 => fixed6(c.f64(SHORT)?),
    };
    Ok(value)
}

/// Six fractional digits; infinities as `+Inf` / `-Inf`.
fn fixed6(v: f64) -> String {
    if v.is_infinite() {
        let sign = if v > 0.0 { '+' } else { '-' };
        format!("{sign}Inf")
    } else {
        format!("{v:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Build one record in the given order, padded to a multiple of 8.
    fn record(endian: Endian, code: u8, value: &[u8], tag: &str) -> Vec<u8> {
        let unpadded = PREAMBLE_SIZE + value.len() + tag.len();
        let lkey = unpadded.div_ceil(8) * 8;
        let lext = (lkey - value.len()) as i16;
        let mut out = Vec::with_capacity(lkey);
        match endian {
            Endian::Big => {
                out.extend_from_slice(&(lkey as i32).to_be_bytes());
                out.extend_from_slice(&lext.to_be_bytes());
            }
            Endian::Little => {
                out.extend_from_slice(&(lkey as i32).to_le_bytes());
                out.extend_from_slice(&lext.to_le_bytes());
            }
        }
        out.push(tag.len() as u8);
        out.push(code);
        out.extend_from_slice(value);
        out.extend_from_slice(tag.as_bytes());
        out.resize(lkey, 0);
        out
    }

    #[test]
    fn decodes_every_type_big_endian() {
        let e = Endian::Big;
        let mut buf = Vec::new();
        buf.extend(record(e, b'A', b"hello", "TEXT"));
        buf.extend(record(e, b'B', &(-5i8).to_be_bytes(), "BYTE"));
        buf.extend(record(e, b'I', &(-300i16).to_be_bytes(), "INT"));
        buf.extend(record(e, b'L', &70000i32.to_be_bytes(), "LONG"));
        buf.extend(record(e, b'X', &(-1i64 << 40).to_be_bytes(), "XLONG"));
        buf.extend(record(e, b'F', &1.5f32.to_be_bytes(), "FLOAT"));
        buf.extend(record(e, b'D', &(-0.25f64).to_be_bytes(), "DOUBLE"));

        let map = parse_extended_header(&buf, e).unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map["TEXT"], "hello");
        assert_eq!(map["BYTE"], "-5");
        assert_eq!(map["INT"], "-300");
        assert_eq!(map["LONG"], "70000");
        assert_eq!(map["XLONG"], "-1099511627776");
        assert_eq!(map["FLOAT"], "1.500000");
        assert_eq!(map["FLOAT"].parse::<f32>().unwrap(), 1.5);
        assert_eq!(map["DOUBLE"], "-0.250000");
    }

    #[test]
    fn decodes_little_endian() {
        let e = Endian::Little;
        let mut buf = record(e, b'L', &(-2i32).to_le_bytes(), "NEG");
        buf.extend(record(e, b'D', &3.0f64.to_le_bytes(), "THREE"));
        let map = parse_extended_header(&buf, e).unwrap();
        assert_eq!(map["NEG"], "-2");
        assert_eq!(map["THREE"], "3.000000");
    }

    #[test]
    fn later_record_overwrites_earlier() {
        let e = Endian::Big;
        let mut buf = record(e, b'A', b"one", "KEY");
        buf.extend(record(e, b'A', b"two", "KEY"));
        let map = parse_extended_header(&buf, e).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["KEY"], "two");
    }

    #[test]
    fn empty_region_is_empty_map() {
        assert!(parse_extended_header(&[], Endian::Big).unwrap().is_empty());
        let mut src = Cursor::new(Vec::<u8>::new());
        assert!(
            read_extended_header(&mut src, Endian::Big, 7, 0)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn unknown_type_aborts() {
        let e = Endian::Big;
        let mut buf = record(e, b'A', b"ok", "FIRST");
        buf.extend(record(e, b'Q', b"xxxx", "BAD"));
        match parse_extended_header(&buf, e) {
            Err(Error::UnknownKeywordType { offset, code }) => {
                assert_eq!(offset, 16);
                assert_eq!(code, b'Q');
            }
            other => panic!("expected UnknownKeywordType, got {other:?}"),
        }
    }

    #[test]
    fn zero_length_record_is_malformed() {
        let mut buf = record(Endian::Big, b'A', b"ok", "K");
        buf[..4].copy_from_slice(&0i32.to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord { offset: 0, .. })
        ));
        buf[..4].copy_from_slice(&(-8i32).to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn overshooting_record_is_trailing() {
        let mut buf = record(Endian::Big, b'A', b"ok", "K");
        let len = buf.len() as i32;
        buf[..4].copy_from_slice(&(len + 8).to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::TrailingBytes { offset: 0, size: 16 })
        ));
    }

    #[test]
    fn leftover_bytes_shorter_than_preamble_are_trailing() {
        let mut buf = record(Endian::Big, b'L', &1i32.to_be_bytes(), "K");
        buf.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::TrailingBytes { offset: 16, .. })
        ));
    }

    #[test]
    fn tag_outside_record_is_malformed() {
        let mut buf = record(Endian::Big, b'A', b"ok", "K");
        buf[6] = 100;
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord { .. })
        ));
        buf[6] = 0x80;
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn extra_longer_than_record_is_malformed() {
        let mut buf = record(Endian::Big, b'A', b"ok", "K");
        buf[4..6].copy_from_slice(&100i16.to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn numeric_value_wider_than_payload_is_malformed() {
        // lkey 16, lext 14: two value bytes, then the tag, for a 4-byte type.
        let mut buf = Vec::new();
        buf.extend_from_slice(&16i32.to_be_bytes());
        buf.extend_from_slice(&14i16.to_be_bytes());
        buf.push(1);
        buf.push(b'L');
        buf.extend_from_slice(&[0x00, 0x07, b'K', 0x01]);
        buf.resize(16, 0);
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::MalformedRecord {
                offset: 0,
                reason: "value wider than payload"
            })
        ));

        let mut wide_enough = buf.clone();
        wide_enough[4..6].copy_from_slice(&12i16.to_be_bytes());
        wide_enough[12] = b'K';
        assert_eq!(
            parse_extended_header(&wide_enough, Endian::Big).unwrap()["K"],
            "477953"
        );
    }

    #[test]
    fn type_code_is_checked_before_lengths() {
        let mut buf = record(Endian::Big, b'Q', b"ok", "K");
        buf[4..6].copy_from_slice(&100i16.to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::UnknownKeywordType { offset: 0, code: b'Q' })
        ));
        buf[6] = 0x80;
        buf[..4].copy_from_slice(&0i32.to_be_bytes());
        assert!(matches!(
            parse_extended_header(&buf, Endian::Big),
            Err(Error::UnknownKeywordType { code: b'Q', .. })
        ));
    }

    #[test]
    fn infinities_render_with_sign() {
        let e = Endian::Big;
        let mut buf = record(e, b'D', &f64::INFINITY.to_be_bytes(), "POS");
        buf.extend(record(e, b'F', &f32::NEG_INFINITY.to_be_bytes(), "NEG"));
        buf.extend(record(e, b'D', &f64::NAN.to_be_bytes(), "NAN"));
        let map = parse_extended_header(&buf, e).unwrap();
        assert_eq!(map["POS"], "+Inf");
        assert_eq!(map["NEG"], "-Inf");
        assert_eq!(map["NAN"], "NaN");
    }

    #[test]
    fn reads_from_block_offset() {
        let e = Endian::Little;
        let rec = record(e, b'I', &42i16.to_le_bytes(), "ANSWER");
        let mut file = vec![0u8; 1024];
        file.extend_from_slice(&rec);
        let mut src = Cursor::new(file);
        let map = read_extended_header(&mut src, e, 2, rec.len() as u32).unwrap();
        assert_eq!(map["ANSWER"], "42");
    }

    #[test]
    fn short_source_is_truncated() {
        let mut src = Cursor::new(vec![0u8; 520]);
        assert!(matches!(
            read_extended_header(&mut src, Endian::Big, 1, 16),
            Err(Error::TruncatedExtendedHeader {
                expected: 16,
                found: 8
            })
        ));
    }
}
