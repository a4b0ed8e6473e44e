//! Blue Files on disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use crate::Result;
use crate::decoded::{DecodeOptions, DecodedHeader, decode_with};

/// A named Blue File and its decoded header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlueFile {
    /// File name as given to [`BlueFile::open`].
    #[cfg_attr(feature = "serde", serde(rename = "filename"))]
    pub file_name: String,
    pub header: DecodedHeader,
}

impl BlueFile {
    /// Open `path` and decode its header with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    /// Open `path` and decode its header.
    ///
    /// The file is closed before returning, whether or not decoding succeeds.
    pub fn open_with<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let header = decode_with(&mut reader, options)?;
        info!("loaded header for {}", path.display());
        Ok(Self {
            file_name: path.display().to_string(),
            header,
        })
    }

    /// Serialize to `{"filename": ..., "header": ...}`.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
