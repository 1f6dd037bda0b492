//! Decoder for the pack wire format: a `"PACK"` signature, a big-endian
//! version and object count, then that many entries packed back to back,
//! each a type/size varint header followed by a zlib stream.

use tracing::*;

use crate::compress;
use crate::database::{Database, ObjectKind};
use crate::digest::Digest;
use crate::error::{Error, Result};

/// Entry kinds as encoded in bits 4-6 of a pack entry's first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    /// A self-contained object, stored as-is.
    Plain(ObjectKind),
    /// A delta against an object at an earlier pack offset. Not resolved.
    OfsDelta,
    /// A delta against an object named by id. Not resolved.
    RefDelta,
}

impl EntryKind {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(EntryKind::Plain(ObjectKind::Commit)),
            2 => Some(EntryKind::Plain(ObjectKind::Tree)),
            3 => Some(EntryKind::Plain(ObjectKind::Blob)),
            4 => Some(EntryKind::Plain(ObjectKind::Tag)),
            6 => Some(EntryKind::OfsDelta),
            7 => Some(EntryKind::RefDelta),
            _ => None,
        }
    }
}

/// What a pack decode produced. `skipped` counts entries that could not be
/// materialized: corrupt streams, size mismatches, and unresolved deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackSummary {
    pub version: u32,
    /// Entries the pack header declared.
    pub declared: u32,
    /// Objects written to the database.
    pub stored: u32,
    /// Entries passed over. Never silent: each one is logged as it happens.
    pub skipped: u32,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::TruncatedPack(what))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn byte(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }
}

/// Decode a pack byte stream, storing every self-contained entry in the
/// database.
///
/// The signature may sit anywhere in the buffer; the smart protocol wraps
/// the pack in pkt-line framing which is simply scanned past. A single
/// entry failing to inflate is recovered locally (skip and continue) as long
/// as its compressed extent could be determined; signature and header
/// failures abort the whole decode.
pub fn unpack(database: &Database, data: &[u8]) -> Result<UnpackSummary> {
    let start = memchr::memmem::find(data, b"PACK").ok_or(Error::InvalidPackSignature)?;

    let mut reader = Reader {
        data: &data[start..],
        pos: 4,
    };
    let version = u32::from_be_bytes(reader.take(4, "pack version")?.try_into().unwrap());
    let declared = u32::from_be_bytes(reader.take(4, "object count")?.try_into().unwrap());
    debug!(version, objects = declared, "Decoding pack");

    let mut stored = 0;
    let mut skipped = 0;

    for index in 0..declared {
        let byte = reader.byte("entry header")?;
        let kind = EntryKind::from_bits((byte >> 4) & 0x7)
            .ok_or(Error::CorruptObject("unknown pack entry type"))?;

        // Declared uncompressed size: low nibble of the first byte, then 7
        // bits per continuation byte, least significant first.
        let mut size = (byte & 0xf) as u64;
        let mut shift = 4;
        let mut byte = byte;
        while byte & 0x80 != 0 {
            byte = reader.byte("entry size")?;
            if shift > 57 {
                return Err(Error::CorruptObject("pack entry size varint overflows"));
            }
            size |= ((byte & 0x7f) as u64) << shift;
            shift += 7;
        }

        match kind {
            EntryKind::Plain(kind) => {
                let (inflated, consumed) = compress::decompress_one(reader.rest());
                if consumed == 0 {
                    return Err(Error::TruncatedPack("entry data"));
                }
                reader.advance(consumed);

                match inflated {
                    Ok(payload) if payload.len() as u64 == size => {
                        database.write(kind, &payload)?;
                        stored += 1;
                    }
                    Ok(payload) => {
                        warn!(
                            entry = index,
                            declared = size,
                            actual = payload.len(),
                            "Pack entry size mismatch, skipping"
                        );
                        skipped += 1;
                    }
                    Err(e) => {
                        warn!(entry = index, error = %e, "Pack entry failed to inflate, skipping");
                        skipped += 1;
                    }
                }
            }
            EntryKind::RefDelta => {
                let base = reader.take(20, "delta base reference")?;
                let base = Digest(base.try_into().unwrap());
                skip_delta(&mut reader)?;
                debug!(base = %base.short(), "Skipping unresolved ref-delta entry");
                skipped += 1;
            }
            EntryKind::OfsDelta => {
                let offset = read_base_offset(&mut reader)?;
                skip_delta(&mut reader)?;
                debug!(offset, "Skipping unresolved ofs-delta entry");
                skipped += 1;
            }
        }
    }

    debug!(stored, skipped, "Pack decoded");
    Ok(UnpackSummary {
        version,
        declared,
        stored,
        skipped,
    })
}

/// Inflate and discard a delta entry's stream. Delta reconstruction is not
/// supported; the stream is decoded only so the cursor lands on the next
/// entry instead of desyncing.
fn skip_delta(reader: &mut Reader) -> Result<()> {
    let (_, consumed) = compress::decompress_one(reader.rest());
    if consumed == 0 {
        return Err(Error::TruncatedPack("delta data"));
    }
    reader.advance(consumed);
    Ok(())
}

/// The ofs-delta base offset: big-endian 7-bit groups, high bit as the
/// continuation flag, with a +1 bias applied on each continuation.
fn read_base_offset(reader: &mut Reader) -> Result<u64> {
    let mut byte = reader.byte("delta base offset")?;
    let mut offset = (byte & 0x7f) as u64;
    while byte & 0x80 != 0 {
        byte = reader.byte("delta base offset")?;
        offset = ((offset + 1) << 7) | (byte & 0x7f) as u64;
    }
    Ok(offset)
}
