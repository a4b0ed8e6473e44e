//! Low-level I/O primitives shared by the decoders.
//!
//! Positioned reads against a seekable source, plus [`ByteCursor`], a
//! bounds-checked reader over an in-memory record.

use std::io::{self, Read, Seek, SeekFrom};

use crate::endian::Endian;
use crate::{Error, Result};

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read) -> io::Result<[u8; N]> {
    let mut b = [0u8; N];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Seek to `offset` and fill as much of `buf` as the source allows.
///
/// Returns the number of bytes read, which is short only at end of stream.
pub(crate) fn fill_at<R: Read + Seek>(r: &mut R, offset: u64, buf: &mut [u8]) -> Result<usize> {
    r.seek(SeekFrom::Start(offset))?;
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Seek to `offset` and read exactly `N` bytes.
///
/// Returns `None` when the source ends first.
pub(crate) fn array_at<R: Read + Seek, const N: usize>(
    r: &mut R,
    offset: u64,
) -> Result<Option<[u8; N]>> {
    let mut b = [0u8; N];
    let n = fill_at(r, offset, &mut b)?;
    Ok((n == N).then_some(b))
}

/// Decode bytes as text the way the header renders them.
#[inline]
pub(crate) fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Bounds-checked reader over one extended header record.
///
/// Positions are relative to the record slice; `base` is the record's offset
/// within the whole extended header and only feeds error reports.
pub(crate) struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(buf: &'a [u8], base: usize, endian: Endian) -> Self {
        Self {
            buf,
            pos: 0,
            base,
            endian,
        }
    }

    /// Move to `pos`, which may equal the record length but not exceed it.
    pub(crate) fn seek(&mut self, pos: usize, reason: &'static str) -> Result<()> {
        if pos > self.buf.len() {
            return Err(self.malformed(reason));
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrow the next `len` bytes and advance past them.
    pub(crate) fn take(&mut self, len: usize, reason: &'static str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| self.malformed(reason))?;
        let buf: &'a [u8] = self.buf;
        let out = &buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn u8(&mut self, reason: &'static str) -> Result<u8> {
        Ok(self.take(1, reason)?[0])
    }

    pub(crate) fn i8(&mut self, reason: &'static str) -> Result<i8> {
        Ok(self.u8(reason)? as i8)
    }

    pub(crate) fn i16(&mut self, reason: &'static str) -> Result<i16> {
        let mut b = self.take(2, reason)?;
        Ok(self.endian.read_i16(&mut b)?)
    }

    pub(crate) fn i32(&mut self, reason: &'static str) -> Result<i32> {
        let mut b = self.take(4, reason)?;
        Ok(self.endian.read_i32(&mut b)?)
    }

    pub(crate) fn i64(&mut self, reason: &'static str) -> Result<i64> {
        let mut b = self.take(8, reason)?;
        Ok(self.endian.read_i64(&mut b)?)
    }

    pub(crate) fn f32(&mut self, reason: &'static str) -> Result<f32> {
        let mut b = self.take(4, reason)?;
        Ok(self.endian.read_f32(&mut b)?)
    }

    pub(crate) fn f64(&mut self, reason: &'static str) -> Result<f64> {
        let mut b = self.take(8, reason)?;
        Ok(self.endian.read_f64(&mut b)?)
    }

    fn malformed(&self, reason: &'static str) -> Error {
        Error::MalformedRecord {
            offset: self.base,
            reason,
        }
    }
}
