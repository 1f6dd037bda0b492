use std::fmt::Display;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::compress;
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::util;

/// The four object kinds a pack can deliver. Locally built objects are only
/// ever blobs, trees, and commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            b"blob" => Ok(ObjectKind::Blob),
            b"tree" => Ok(ObjectKind::Tree),
            b"commit" => Ok(ObjectKind::Commit),
            b"tag" => Ok(ObjectKind::Tag),
            _ => Err(Error::CorruptObject("unknown object kind in header")),
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object read back from the database, decompressed and stripped of its
/// header. The payload length is the authoritative size.
#[derive(Debug)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

impl StoredObject {
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn require(self, kind: ObjectKind) -> Result<Self> {
        if self.kind == kind {
            Ok(self)
        } else {
            Err(Error::WrongObjectKind {
                expected: kind,
                found: self.kind,
            })
        }
    }
}

/// The uncompressed on-disk encoding of an object: `"<kind> <len>\0"` + payload.
fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(payload.len() + 16);
    content.extend_from_slice(kind.as_str().as_bytes());
    content.push(b' ');
    content.extend_from_slice(payload.len().to_string().as_bytes());
    content.push(b'\0');
    content.extend_from_slice(payload);
    content
}

/// Compute the id an object would be stored under, without writing it.
pub fn object_id(kind: ObjectKind, payload: &[u8]) -> Digest {
    Digest::new(&encode(kind, payload))
}

pub struct Database {
    database_root: Utf8PathBuf,
}

impl Database {
    pub fn new(git_folder: impl AsRef<Utf8Path>) -> Self {
        Self {
            database_root: git_folder.as_ref().join("objects"),
        }
    }

    fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        debug_assert_eq!(prefix.len(), 2);
        self.database_root.join(prefix).join(suffix)
    }

    pub fn exists(&self, oid: &Digest) -> bool {
        self.object_path(oid).exists()
    }

    /// Write an object, returning its id. The store is write-once per id:
    /// if the object file already exists the call is a no-op, which is
    /// observationally identical since the encoding is deterministic.
    pub fn write(&self, kind: ObjectKind, payload: &[u8]) -> Result<Digest> {
        let content = encode(kind, payload);
        let oid = Digest::new(&content);
        trace!(oid = %oid.short(), %kind, "Writing object to database");

        let hex = oid.to_hex();
        let (prefix, suffix) = hex.split_at(2);
        let dirname = self.database_root.join(prefix);
        let object_path = dirname.join(suffix);

        if object_path.exists() {
            return Ok(oid);
        }

        if !dirname.is_dir() {
            std::fs::create_dir_all(&dirname)?;
        }

        let compressed = compress::compress(&content)?;

        let temp_path = dirname.join(util::tmp_file_name());
        std::fs::write(&temp_path, compressed)?;
        std::fs::rename(temp_path, object_path)?;

        Ok(oid)
    }

    /// Read an object back by id, decompressing and parsing the header.
    pub fn read(&self, oid: &Digest) -> Result<StoredObject> {
        trace!(oid = %oid.short(), "Reading object from database");

        let object_path = self.object_path(oid);
        if !object_path.exists() {
            return Err(Error::ObjectNotFound(oid.clone()));
        }

        let compressed = std::fs::read(object_path)?;
        let bytes = compress::decompress_all(&compressed)?;

        let space_idx = memchr::memchr(b' ', &bytes)
            .ok_or(Error::CorruptObject("no space in object header"))?;
        let nul_idx = memchr::memchr(b'\0', &bytes)
            .ok_or(Error::CorruptObject("no null byte in object header"))?;
        if nul_idx < space_idx {
            return Err(Error::CorruptObject("mangled object header"));
        }

        let kind = ObjectKind::from_bytes(&bytes[..space_idx])?;
        let declared = std::str::from_utf8(&bytes[space_idx + 1..nul_idx])
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or(Error::CorruptObject("object size is not a number"))?;

        let payload = bytes[nul_idx + 1..].to_vec();
        debug_assert_eq!(
            declared,
            payload.len(),
            "declared object size should match payload length"
        );

        Ok(StoredObject { kind, payload })
    }
}
