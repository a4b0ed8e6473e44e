//! **bluekit** - a decoder for Midas Blue File headers.
//!
//! A Blue File starts with a 512-byte header control block: 256 bytes of
//! fixed fields (including a small `KEY=VALUE` keyword area) and a 256-byte
//! adjunct. An optional extended header, aligned to a 512-byte block, holds
//! typed keyword records. The data section is described but never read.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`endian`]   | `IEEE` / `EEEI` byte-order tags |
//! | [`header`]   | Fixed header layout |
//! | [`keywords`] | Fixed header keywords |
//! | [`extended`] | Extended header records |
//! | [`decoded`]  | Full decode and the [`DecodedHeader`] view |
//! | [`file`]     | Opening Blue Files by path |
//!
//! ```no_run
//! let bf = bluekit::BlueFile::open("signal.tmp")?;
//! println!("{:?}", bf.header.extended.get("RF_FREQ"));
//! # Ok::<(), bluekit::Error>(())
//! ```
//!
//! ## Features
//! * `serde` - `Serialize` for [`DecodedHeader`] and [`BlueFile`].
//! * `json` - `to_json` helpers.
//! * `cli` - the `bluehdr` binary.

pub mod decoded;
pub mod endian;
pub mod error;
pub mod extended;
pub mod file;
pub mod header;
pub mod keywords;
mod utils;

pub use decoded::{DecodeOptions, DecodedHeader, decode, decode_with};
pub use endian::Endian;
pub use error::{Error, Result};
pub use file::BlueFile;
pub use header::RawFixedHeader;
pub use keywords::KeywordMode;
