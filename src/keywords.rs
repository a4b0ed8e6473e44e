//! Fixed header keywords.
//!
//! The fixed header carries up to 92 bytes of `KEY=VALUE` entries separated
//! by NUL bytes. Only the first `keylength` bytes are meaningful.

use std::collections::BTreeMap;

use log::warn;

use crate::utils::text;
use crate::{Error, Result};

/// How entries that are not a single `KEY=VALUE` pair are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordMode {
    /// Skip malformed entries.
    #[default]
    Permissive,
    /// Fail on the first malformed entry with [`Error::MalformedKeyword`].
    Strict,
}

/// Split the used part of a keyword area into a key/value map.
///
/// An entry must contain exactly one `=`. Empty entries are ignored in both
/// modes. A repeated key keeps its last value.
pub fn parse_fixed_keywords(used: &[u8], mode: KeywordMode) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in used.split(|&b| b == 0) {
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.split(|&b| b == b'=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                map.insert(text(key), text(value));
            }
            _ => match mode {
                KeywordMode::Permissive => warn!("skipping fixed keyword {:?}", text(entry)),
                KeywordMode::Strict => return Err(Error::MalformedKeyword(text(entry))),
            },
        }
    }
    Ok(map)
}
