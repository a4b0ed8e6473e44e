//! Full header decoding.
//!
//! [`decode`] checks the `BLUE` magic, parses the fixed header, walks the
//! extended header and splits the fixed keywords, returning one
//! [`DecodedHeader`]. Nothing is returned unless every step succeeds.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use log::debug;

use crate::endian::Endian;
use crate::extended::read_extended_header;
use crate::header::RawFixedHeader;
use crate::keywords::{KeywordMode, parse_fixed_keywords};
use crate::utils::{array_at, text};
use crate::{Error, Result};

/// File magic at offset 0.
pub const MIDAS_BLUE: [u8; 4] = *b"BLUE";

/// Decoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Handling of malformed fixed keyword entries.
    pub keyword_mode: KeywordMode,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword_mode(mut self, mode: KeywordMode) -> Self {
        self.keyword_mode = mode;
        self
    }
}

/// A decoded Blue File header.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedHeader {
    /// The fixed header as stored.
    pub raw: RawFixedHeader,
    pub version: String,
    pub head_rep: String,
    pub data_rep: String,
    pub format: String,
    /// Inlet count, in the header byte order.
    pub inlet: u16,
    /// Outlet count, in the header byte order.
    pub outlets: u16,
    /// Fixed header keywords.
    pub keywords: BTreeMap<String, String>,
    /// Extended header keywords, values rendered as text.
    pub extended: BTreeMap<String, String>,
}

impl DecodedHeader {
    /// Build the decoded view of a fixed header and its extended keywords.
    pub fn from_parts(
        raw: RawFixedHeader,
        extended: BTreeMap<String, String>,
        mode: KeywordMode,
    ) -> Result<Self> {
        let endian = raw.header_endian()?;
        let keywords = parse_fixed_keywords(raw.used_keywords()?, mode)?;
        Ok(Self {
            version: text(&raw.version),
            head_rep: text(&raw.head_rep),
            data_rep: text(&raw.data_rep),
            format: text(&raw.format),
            inlet: endian.u16_from_bytes(raw.inlet),
            outlets: endian.u16_from_bytes(raw.outlets),
            keywords,
            extended,
            raw,
        })
    }

    /// Byte order of the header.
    pub fn endian(&self) -> Result<Endian> {
        self.raw.header_endian()
    }

    /// Serialize to the JSON document served for a header.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a Blue File header with default options.
pub fn decode<R: Read + Seek>(r: &mut R) -> Result<DecodedHeader> {
    decode_with(r, DecodeOptions::default())
}

/// Decode a Blue File header.
///
/// `r` may be positioned anywhere; all reads are absolute from offset 0.
pub fn decode_with<R: Read + Seek>(r: &mut R, options: DecodeOptions) -> Result<DecodedHeader> {
    check_magic(r)?;

    let raw = RawFixedHeader::parse(r)?;
    let endian = raw.header_endian()?;
    let extended = read_extended_header(r, endian, raw.ext_start, raw.ext_size)?;
    let header = DecodedHeader::from_parts(raw, extended, options.keyword_mode)?;

    debug!(
        "decoded {} header: {} fixed, {} extended keywords",
        header.version,
        header.keywords.len(),
        header.extended.len()
    );
    Ok(header)
}

/// Verify the `BLUE` magic.
///
/// A source shorter than the magic is a [`Error::TruncatedHeader`].
pub fn check_magic<R: Read + Seek>(r: &mut R) -> Result<()> {
    let got = array_at::<_, 4>(r, 0)?.ok_or(Error::TruncatedHeader)?;
    if got != MIDAS_BLUE {
        return Err(Error::NotABlueFile);
    }
    Ok(())
}

/// Field order follows the served header document: the fixed fields, then
/// the decoded `format`, `inlet` and `outlets`, then both keyword maps.
#[cfg(feature = "serde")]
impl serde::Serialize for DecodedHeader {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let raw = &self.raw;
        let mut st = s.serialize_struct("DecodedHeader", 26)?;
        st.serialize_field("version", &self.version)?;
        st.serialize_field("head_rep", &self.head_rep)?;
        st.serialize_field("data_rep", &self.data_rep)?;
        st.serialize_field("detached", &raw.detached)?;
        st.serialize_field("protected", &raw.protected)?;
        st.serialize_field("pipe", &raw.pipe)?;
        st.serialize_field("ext_start", &raw.ext_start)?;
        st.serialize_field("ext_size", &raw.ext_size)?;
        st.serialize_field("data_start", &JsonFloat(raw.data_start))?;
        st.serialize_field("data_size", &JsonFloat(raw.data_size))?;
        st.serialize_field("type", &raw.type_code)?;
        st.serialize_field("flagmask", &raw.flagmask)?;
        st.serialize_field("timecode", &JsonFloat(raw.timecode))?;
        st.serialize_field("outmask", &raw.outmask)?;
        st.serialize_field("pipeloc", &raw.pipeloc)?;
        st.serialize_field("pipesize", &raw.pipesize)?;
        st.serialize_field("in_byte", &JsonFloat(raw.in_byte))?;
        st.serialize_field("out_byte", &JsonFloat(raw.out_byte))?;
        st.serialize_field("out_bytes", &raw.out_bytes.map(JsonFloat))?;
        st.serialize_field("keylength", &raw.keylength)?;
        st.serialize_field("adjunct", &raw.adjunct[..])?;
        st.serialize_field("format", &self.format)?;
        st.serialize_field("inlet", &self.inlet)?;
        st.serialize_field("outlets", &self.outlets)?;
        st.serialize_field("keywords", &self.keywords)?;
        st.serialize_field("extendedHeaders", &self.extended)?;
        st.end()
    }
}

/// A header float, written without a fraction when it is a whole number
/// (`512`, not `512.0`).
#[cfg(feature = "serde")]
#[derive(Clone, Copy)]
struct JsonFloat(f64);

#[cfg(feature = "serde")]
impl serde::Serialize for JsonFloat {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        // 2^53: every whole number below it is exact in both f64 and i64.
        const EXACT: f64 = 9_007_199_254_740_992.0;
        let v = self.0;
        let negative_zero = v == 0.0 && v.is_sign_negative();
        if v.fract() == 0.0 && v.abs() < EXACT && !negative_zero {
            s.serialize_i64(v as i64)
        } else {
            s.serialize_f64(v)
        }
    }
}
