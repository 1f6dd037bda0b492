use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::filemode::FileMode;

use super::{Tree, TreeEntry};

impl Tree {
    /// Parse a tree payload. Entries are of the form
    /// `<mode> <name>\0<20 raw oid bytes>`, packed back to back.
    ///
    /// Entry order is preserved exactly as encoded; an empty payload is an
    /// empty tree.
    pub fn parse(mut bytes: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();

        while !bytes.is_empty() {
            let space_idx =
                memchr::memchr(b' ', bytes).ok_or(Error::CorruptObject("tree entry has no mode"))?;
            let mode = std::str::from_utf8(&bytes[..space_idx])
                .map_err(|_| Error::CorruptObject("tree entry mode is not utf-8"))?;
            let mode = FileMode(
                u32::from_str_radix(mode, 8)
                    .map_err(|_| Error::CorruptObject("tree entry mode is not octal"))?,
            );
            bytes = &bytes[space_idx + 1..];

            let nul_idx = memchr::memchr(b'\0', bytes)
                .ok_or(Error::CorruptObject("tree entry name is unterminated"))?;
            let name = std::str::from_utf8(&bytes[..nul_idx])
                .map_err(|_| Error::CorruptObject("tree entry name is not utf-8"))?
                .to_owned();
            bytes = &bytes[nul_idx + 1..];

            if bytes.len() < 20 {
                return Err(Error::CorruptObject("tree entry oid is truncated"));
            }
            let (oid, rest) = bytes.split_at(20);
            let oid = Digest(oid.try_into().unwrap());
            bytes = rest;

            entries.push(TreeEntry { mode, name, oid });
        }

        Ok(Tree { entries })
    }
}
