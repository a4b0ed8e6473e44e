//! Fixed header: the first 512 bytes of a Blue File.
//!
//! ## Layout
//! ```text
//! [0x000] version      char[4]
//! [0x004] head_rep     char[4]   byte order of this header ("IEEE" | "EEEI")
//! [0x008] data_rep     char[4]   byte order of the data section
//! [0x00C] detached     u32
//! [0x010] protected    u32
//! [0x014] pipe         u32
//! [0x018] ext_start    u32       extended header start, in 512-byte blocks
//! [0x01C] ext_size     u32       extended header size, in bytes
//! [0x020] data_start   f64
//! [0x028] data_size    f64
//! [0x030] type         u32
//! [0x034] format       char[2]
//! [0x036] flagmask     u16
//! [0x038] timecode     f64
//! [0x040] inlet        2 bytes
//! [0x042] outlets      2 bytes
//! [0x044] outmask      u32
//! [0x048] pipeloc      u32
//! [0x04C] pipesize     u32
//! [0x050] in_byte      f64
//! [0x058] out_byte     f64
//! [0x060] out_bytes    f64[8]
//! [0x0A0] keylength    u32       used length of `keywords`
//! [0x0A4] keywords     char[92]  NUL-separated "KEY=VALUE" entries
//! [0x100] adjunct      256 bytes, type-specific
//! ```
//! All multi-byte fields use the order named by `head_rep`.

use std::io::{Read, Seek};

use log::debug;

use crate::endian::Endian;
use crate::utils::{array_at, bytesa, fill_at};
use crate::{Error, Result};

/// Size of the fixed field region.
pub const FIXED_SIZE: usize = 256;

/// Size of the adjunct block that follows the fixed fields.
pub const ADJUNCT_SIZE: usize = 256;

/// Size of the whole header control block.
pub const HCB_SIZE: usize = FIXED_SIZE + ADJUNCT_SIZE;

/// Size of the fixed keyword area.
pub const KEYWORDS_SIZE: usize = 92;

/// Byte offset of `head_rep`.
pub(crate) const HEAD_REP_OFFSET: u64 = 4;

/// Raw fixed header fields, exactly as stored.
///
/// Tag fields stay as raw bytes; see [`crate::DecodedHeader`] for the
/// decoded projections.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFixedHeader {
    pub version: [u8; 4],
    pub head_rep: [u8; 4],
    pub data_rep: [u8; 4],
    pub detached: u32,
    pub protected: u32,
    pub pipe: u32,
    /// Extended header start, in 512-byte blocks from the start of the file.
    pub ext_start: u32,
    /// Extended header size in bytes.
    pub ext_size: u32,
    pub data_start: f64,
    pub data_size: f64,
    pub type_code: u32,
    pub format: [u8; 2],
    pub flagmask: u16,
    pub timecode: f64,
    pub inlet: [u8; 2],
    pub outlets: [u8; 2],
    pub outmask: u32,
    pub pipeloc: u32,
    pub pipesize: u32,
    pub in_byte: f64,
    pub out_byte: f64,
    pub out_bytes: [f64; 8],
    /// Number of meaningful bytes in `keywords`.
    pub keylength: u32,
    pub keywords: [u8; KEYWORDS_SIZE],
    pub adjunct: [u8; ADJUNCT_SIZE],
}

impl RawFixedHeader {
    /// Parse the fixed header from the start of `r`.
    ///
    /// The byte order is taken from `head_rep`; `data_rep` is kept verbatim.
    /// At least [`FIXED_SIZE`] bytes must be available. The adjunct is read
    /// when present and zero-filled past the end of a shorter source.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let head_rep =
            array_at::<_, 4>(r, HEAD_REP_OFFSET)?.ok_or(Error::TruncatedHeader)?;
        let endian = Endian::from_tag(&head_rep)?;
        debug!("header byte order {endian:?}");

        let mut block = [0u8; HCB_SIZE];
        let n = fill_at(r, 0, &mut block)?;
        if n < FIXED_SIZE {
            return Err(Error::TruncatedHeader);
        }
        if n < HCB_SIZE {
            debug!("adjunct truncated to {} bytes", n - FIXED_SIZE);
        }

        Ok(Self::from_block(&block, endian)?)
    }

    fn from_block(block: &[u8; HCB_SIZE], e: Endian) -> std::io::Result<Self> {
        let r = &mut &block[..];

        let version = bytesa::<4>(r)?;
        let head_rep = bytesa::<4>(r)?;
        let data_rep = bytesa::<4>(r)?;
        let detached = e.read_u32(r)?;
        let protected = e.read_u32(r)?;
        let pipe = e.read_u32(r)?;
        let ext_start = e.read_u32(r)?;
        let ext_size = e.read_u32(r)?;
        let data_start = e.read_f64(r)?;
        let data_size = e.read_f64(r)?;
        let type_code = e.read_u32(r)?;
        let format = bytesa::<2>(r)?;
        let flagmask = e.read_u16(r)?;
        let timecode = e.read_f64(r)?;
        let inlet = bytesa::<2>(r)?;
        let outlets = bytesa::<2>(r)?;
        let outmask = e.read_u32(r)?;
        let pipeloc = e.read_u32(r)?;
        let pipesize = e.read_u32(r)?;
        let in_byte = e.read_f64(r)?;
        let out_byte = e.read_f64(r)?;
        let mut out_bytes = [0f64; 8];
        for slot in &mut out_bytes {
            *slot = e.read_f64(r)?;
        }
        let keylength = e.read_u32(r)?;
        let keywords = bytesa::<KEYWORDS_SIZE>(r)?;
        let adjunct = bytesa::<ADJUNCT_SIZE>(r)?;

        Ok(Self {
            version,
            head_rep,
            data_rep,
            detached,
            protected,
            pipe,
            ext_start,
            ext_size,
            data_start,
            data_size,
            type_code,
            format,
            flagmask,
            timecode,
            inlet,
            outlets,
            outmask,
            pipeloc,
            pipesize,
            in_byte,
            out_byte,
            out_bytes,
            keylength,
            keywords,
            adjunct,
        })
    }

    /// Byte order of this header.
    pub fn header_endian(&self) -> Result<Endian> {
        Endian::from_tag(&self.head_rep)
    }

    /// Byte order declared for the data section.
    ///
    /// Informational only; nothing in the header is decoded with it.
    pub fn data_endian(&self) -> Result<Endian> {
        Endian::from_tag(&self.data_rep)
    }

    /// Absolute byte offset of the extended header.
    pub fn ext_offset(&self) -> u64 {
        self.ext_start as u64 * 512
    }

    /// The used part of the keyword area.
    ///
    /// Returns [`Error::KeywordLengthOutOfRange`] if `keylength` claims more
    /// than [`KEYWORDS_SIZE`] bytes.
    pub fn used_keywords(&self) -> Result<&[u8]> {
        self.keywords
            .get(..self.keylength as usize)
            .ok_or(Error::KeywordLengthOutOfRange(self.keylength))
    }
}
