//! Midas byte-order tags.
//!
//! Every Blue File records two byte orders as 4-byte ASCII tags: one for the
//! header itself (`head_rep`) and one for the data section (`data_rep`).
//!
//! | Tag    | Bytes         | Order         |
//! |--------|---------------|---------------|
//! | `IEEE` | `49 45 45 45` | big-endian    |
//! | `EEEI` | `45 45 45 49` | little-endian |

use std::io::Read;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::{Error, Result};

/// Tag for big-endian data.
pub const MIDAS_BIG_ENDIAN: [u8; 4] = *b"IEEE";

/// Tag for little-endian data.
pub const MIDAS_LITTLE_ENDIAN: [u8; 4] = *b"EEEI";

/// Byte order resolved from a Midas representation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// Resolve a representation tag.
    ///
    /// Returns [`Error::InvalidEndianness`] for anything other than `IEEE` or
    /// `EEEI`; there is no fallback order.
    pub fn from_tag(tag: &[u8; 4]) -> Result<Self> {
        match *tag {
            MIDAS_BIG_ENDIAN => Ok(Endian::Big),
            MIDAS_LITTLE_ENDIAN => Ok(Endian::Little),
            other => Err(Error::InvalidEndianness(other)),
        }
    }

    /// The tag that resolves to this byte order.
    pub fn tag(self) -> [u8; 4] {
        match self {
            Endian::Big => MIDAS_BIG_ENDIAN,
            Endian::Little => MIDAS_LITTLE_ENDIAN,
        }
    }

    /// Interpret two raw bytes as a `u16`.
    pub fn u16_from_bytes(self, b: [u8; 2]) -> u16 {
        match self {
            Endian::Big => u16::from_be_bytes(b),
            Endian::Little => u16::from_le_bytes(b),
        }
    }

    #[inline]
    pub(crate) fn read_u16<R: Read>(self, r: &mut R) -> std::io::Result<u16> {
        match self {
            Endian::Big => r.read_u16::<BigEndian>(),
            Endian::Little => r.read_u16::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_u32<R: Read>(self, r: &mut R) -> std::io::Result<u32> {
        match self {
            Endian::Big => r.read_u32::<BigEndian>(),
            Endian::Little => r.read_u32::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_i16<R: Read>(self, r: &mut R) -> std::io::Result<i16> {
        match self {
            Endian::Big => r.read_i16::<BigEndian>(),
            Endian::Little => r.read_i16::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_i32<R: Read>(self, r: &mut R) -> std::io::Result<i32> {
        match self {
            Endian::Big => r.read_i32::<BigEndian>(),
            Endian::Little => r.read_i32::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_i64<R: Read>(self, r: &mut R) -> std::io::Result<i64> {
        match self {
            Endian::Big => r.read_i64::<BigEndian>(),
            Endian::Little => r.read_i64::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_f32<R: Read>(self, r: &mut R) -> std::io::Result<f32> {
        match self {
            Endian::Big => r.read_f32::<BigEndian>(),
            Endian::Little => r.read_f32::<LittleEndian>(),
        }
    }

    #[inline]
    pub(crate) fn read_f64<R: Read>(self, r: &mut R) -> std::io::Result<f64> {
        match self {
            Endian::Big => r.read_f64::<BigEndian>(),
            Endian::Little => r.read_f64::<LittleEndian>(),
        }
    }
}
