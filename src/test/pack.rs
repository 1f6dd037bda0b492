use camino::Utf8Path;
use pretty_assertions::assert_eq;
use tempdir::TempDir;

use crate::compress;
use crate::database::{object_id, Database, ObjectKind};
use crate::error::Error;
use crate::pack::unpack;
use crate::Result;

const OBJ_COMMIT: u8 = 1;
const OBJ_BLOB: u8 = 3;
const OBJ_OFS_DELTA: u8 = 6;
const OBJ_REF_DELTA: u8 = 7;

/// Encode a pack entry header: type in bits 4-6, size as a base-128 varint
/// seeded from the first byte's low nibble.
fn entry_header(kind: u8, size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut first = (kind << 4) | (size & 0xf) as u8;
    let mut rest = size >> 4;
    if rest > 0 {
        first |= 0x80;
    }
    out.push(first);
    while rest > 0 {
        let mut byte = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest > 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
    out
}

fn entry(kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = entry_header(kind, payload.len());
    out.extend_from_slice(&compress::compress(payload).unwrap());
    out
}

fn pack_bytes(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut data = b"PACK".to_vec();
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for entry in entries {
        data.extend_from_slice(entry);
    }
    data
}

fn test_database() -> (TempDir, Database) {
    let dir = TempDir::new("").unwrap();
    let database = Database::new(Utf8Path::from_path(dir.path()).unwrap());
    (dir, database)
}

#[test]
fn unpack_stores_every_declared_object() -> Result<()> {
    let (_dir, database) = test_database();

    // Long enough that the size varint needs a continuation byte.
    let big = b"a blob large enough to need more than one size byte\n".repeat(4);
    let commit = b"tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5\n";
    let entries = [
        entry(OBJ_BLOB, b"hello\n"),
        entry(OBJ_BLOB, &big),
        entry(OBJ_COMMIT, commit),
    ];

    // The smart protocol precedes the pack with pkt-line framing; the
    // decoder scans forward to the signature.
    let mut data = b"0008NAK\n".to_vec();
    data.extend_from_slice(&pack_bytes(&entries));

    let summary = unpack(&database, &data)?;
    assert_eq!(summary.version, 2);
    assert_eq!(summary.declared, 3);
    assert_eq!(summary.stored, 3);
    assert_eq!(summary.skipped, 0);

    let blob = database.read(&object_id(ObjectKind::Blob, b"hello\n"))?;
    assert_eq!(blob.kind, ObjectKind::Blob);
    assert_eq!(blob.payload, b"hello\n");

    let blob = database.read(&object_id(ObjectKind::Blob, &big))?;
    assert_eq!(blob.payload, big);

    let commit = database.read(&object_id(ObjectKind::Commit, commit))?;
    assert_eq!(commit.kind, ObjectKind::Commit);

    Ok(())
}

#[test]
fn unpack_survives_a_corrupt_entry() -> Result<()> {
    let (_dir, database) = test_database();

    let mut corrupt = entry(OBJ_BLOB, b"this one gets mangled\n");
    // Flip the stream's final checksum byte: the entry inflates to the end
    // and then fails verification.
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0xff;

    let entries = [
        entry(OBJ_BLOB, b"first\n"),
        entry(OBJ_BLOB, b"second\n"),
        corrupt,
    ];

    let summary = unpack(&database, &pack_bytes(&entries))?;
    assert_eq!(summary.stored, 2);
    assert_eq!(summary.skipped, 1);

    assert!(database.exists(&object_id(ObjectKind::Blob, b"first\n")));
    assert!(database.exists(&object_id(ObjectKind::Blob, b"second\n")));
    assert!(!database.exists(&object_id(ObjectKind::Blob, b"this one gets mangled\n")));

    Ok(())
}

#[test]
/// Delta entries are not resolved, but they must not desync the cursor:
/// entries after them still decode.
fn unpack_skips_delta_entries_and_keeps_going() -> Result<()> {
    let (_dir, database) = test_database();

    let delta_payload = b"\x01\x02delta instructions";
    let mut ref_delta = entry_header(OBJ_REF_DELTA, delta_payload.len());
    ref_delta.extend_from_slice(&[0xab; 20]);
    ref_delta.extend_from_slice(&compress::compress(delta_payload).unwrap());

    let mut ofs_delta = entry_header(OBJ_OFS_DELTA, delta_payload.len());
    ofs_delta.push(0x05); // base offset varint, single byte
    ofs_delta.extend_from_slice(&compress::compress(delta_payload).unwrap());

    let entries = [ref_delta, ofs_delta, entry(OBJ_BLOB, b"after the deltas\n")];

    let summary = unpack(&database, &pack_bytes(&entries))?;
    assert_eq!(summary.stored, 1);
    assert_eq!(summary.skipped, 2);
    assert!(database.exists(&object_id(ObjectKind::Blob, b"after the deltas\n")));

    Ok(())
}

#[test]
fn unpack_skips_an_entry_whose_size_lies() -> Result<()> {
    let (_dir, database) = test_database();

    let mut lying = entry_header(OBJ_BLOB, 3);
    lying.extend_from_slice(&compress::compress(b"more than three bytes\n").unwrap());

    let entries = [lying, entry(OBJ_BLOB, b"honest\n")];

    let summary = unpack(&database, &pack_bytes(&entries))?;
    assert_eq!(summary.stored, 1);
    assert_eq!(summary.skipped, 1);
    assert!(database.exists(&object_id(ObjectKind::Blob, b"honest\n")));

    Ok(())
}

#[test]
fn missing_signature_is_fatal() {
    let (_dir, database) = test_database();

    let err = unpack(&database, b"not a pack at all").unwrap_err();
    assert!(matches!(err, Error::InvalidPackSignature));
}

#[test]
fn truncated_header_is_fatal() {
    let (_dir, database) = test_database();

    let err = unpack(&database, b"PACK\x00\x00\x00\x02\x00").unwrap_err();
    assert!(matches!(err, Error::TruncatedPack(_)));
}

#[test]
fn truncated_entry_is_fatal() {
    let (_dir, database) = test_database();

    // Declares one object but ends right after the count.
    let mut data = b"PACK".to_vec();
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&1u32.to_be_bytes());

    let err = unpack(&database, &data).unwrap_err();
    assert!(matches!(err, Error::TruncatedPack(_)));
}
