//! In-memory Blue File builder.

#![allow(dead_code)]

use bluekit::Endian;

pub struct BlueBuilder {
    pub endian: Endian,
    pub keywords: Vec<u8>,
    pub keylength: Option<u32>,
    pub ext_start: u32,
    pub records: Vec<u8>,
    pub ext_size: Option<u32>,
    pub data: Vec<u8>,
}

impl BlueBuilder {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            keywords: Vec::new(),
            keylength: None,
            ext_start: 1,
            records: Vec::new(),
            ext_size: None,
            data: Vec::new(),
        }
    }

    pub fn keywords(mut self, blob: &[u8]) -> Self {
        self.keywords = blob.to_vec();
        self
    }

    pub fn keylength(mut self, len: u32) -> Self {
        self.keylength = Some(len);
        self
    }

    pub fn ext_size(mut self, size: u32) -> Self {
        self.ext_size = Some(size);
        self
    }

    /// Place `len` bytes of data between the header and the extended header.
    pub fn data(mut self, len: usize) -> Self {
        self.data = vec![0x5A; len];
        self
    }

    pub fn record(mut self, code: u8, value: &[u8], tag: &str) -> Self {
        let unpadded = 8 + value.len() + tag.len();
        let lkey = unpadded.div_ceil(8) * 8;
        let lext = (lkey - value.len()) as i16;
        let e = self.endian;
        self.records.extend_from_slice(&i32_bytes(e, lkey as i32));
        self.records.extend_from_slice(&i16_bytes(e, lext));
        self.records.push(tag.len() as u8);
        self.records.push(code);
        self.records.extend_from_slice(value);
        self.records.extend_from_slice(tag.as_bytes());
        self.records.resize(self.records.len() + lkey - unpadded, 0);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let e = self.endian;
        let mut f = vec![0u8; 512];
        f[0..4].copy_from_slice(b"BLUE");
        f[4..8].copy_from_slice(&e.tag());
        f[8..12].copy_from_slice(&e.tag());

        let data_blocks = self.data.len().div_ceil(512) as u32;
        let ext_start = self.ext_start.max(1 + data_blocks);
        let ext_size = self.ext_size.unwrap_or(self.records.len() as u32);
        let keylength = self.keylength.unwrap_or(self.keywords.len() as u32);

        f[24..28].copy_from_slice(&u32_bytes(e, ext_start));
        f[28..32].copy_from_slice(&u32_bytes(e, ext_size));
        f[32..40].copy_from_slice(&f64_bytes(e, 512.0));
        f[40..48].copy_from_slice(&f64_bytes(e, self.data.len() as f64));
        f[48..52].copy_from_slice(&u32_bytes(e, 1000));
        f[52..54].copy_from_slice(b"SF");
        f[160..164].copy_from_slice(&u32_bytes(e, keylength));
        f[164..164 + self.keywords.len()].copy_from_slice(&self.keywords);

        f.extend_from_slice(&self.data);
        f.resize(ext_start as usize * 512, 0);
        f.extend_from_slice(&self.records);
        f
    }
}

fn u32_bytes(e: Endian, v: u32) -> [u8; 4] {
    match e {
        Endian::Big => v.to_be_bytes(),
        Endian::Little => v.to_le_bytes(),
    }
}

fn i32_bytes(e: Endian, v: i32) -> [u8; 4] {
    match e {
        Endian::Big => v.to_be_bytes(),
        Endian::Little => v.to_le_bytes(),
    }
}

fn i16_bytes(e: Endian, v: i16) -> [u8; 2] {
    match e {
        Endian::Big => v.to_be_bytes(),
        Endian::Little => v.to_le_bytes(),
    }
}

fn f64_bytes(e: Endian, v: f64) -> [u8; 8] {
    match e {
        Endian::Big => v.to_be_bytes(),
        Endian::Little => v.to_le_bytes(),
    }
}

/// Encode a value in the builder's byte order.
pub fn num<const N: usize>(e: Endian, be: [u8; N]) -> [u8; N] {
    let mut b = be;
    if e == Endian::Little {
        b.reverse();
    }
    b
}
