//! Zlib streams, as used for object storage and pack extraction.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};

/// Compress `bytes` into a single complete zlib stream at the default level.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut e = ZlibEncoder::new(Vec::with_capacity(bytes.len()), Compression::default());
    e.write_all(bytes)?;
    Ok(e.finish()?)
}

/// Decompress a complete zlib stream.
pub fn decompress_all(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut d = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    d.read_to_end(&mut out).map_err(Error::CorruptStream)?;
    Ok(out)
}

/// Decompress exactly one zlib stream embedded at the start of `bytes`.
///
/// Pack entries are laid out back to back with no per-entry compressed-length
/// field, so the caller needs the number of *input* bytes the inflater
/// consumed to find the next entry. That count is reported even when the
/// stream turns out to be corrupt; a count of zero means the inflater made no
/// progress and the position is unrecoverable.
pub fn decompress_one(bytes: &[u8]) -> (Result<Vec<u8>>, usize) {
    let mut d = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    let res = d.read_to_end(&mut out);
    let consumed = d.total_in() as usize;
    match res {
        Ok(_) => (Ok(out), consumed),
        Err(e) => (Err(Error::CorruptStream(e)), consumed),
    }
}
