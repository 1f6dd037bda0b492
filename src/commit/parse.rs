use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::digest::Digest;
use crate::error::{Error, Result};

use super::{Commit, Signature, Timestamp};

impl Commit {
    /// Parse a decompressed commit payload.
    ///
    /// ## Example
    /// ```text
    /// tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
    /// parent e6a49274aa0893ce2e2928589100387aee220c5b
    /// author Gitlet <gitlet@example.com> 1658312219 +0000
    /// committer Gitlet <gitlet@example.com> 1658312219 +0000
    ///
    /// Add the thing
    /// ```
    ///
    /// Only the first parent of a merge commit is kept. Header keys other
    /// than the four above (signatures, for instance) are not understood;
    /// everything after the first blank line is the message.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut lines = bytes.split(|&b| b == b'\n');

        let line = lines.next().ok_or(Error::CorruptObject("commit is empty"))?;
        let tree_id = line
            .strip_prefix(b"tree ")
            .ok_or(Error::CorruptObject("commit has no tree line"))?;
        let tree_id = Digest::from_str(
            std::str::from_utf8(tree_id)
                .map_err(|_| Error::CorruptObject("commit tree id is not utf-8"))?,
        )?;

        let mut parent = None;
        let mut line = lines
            .next()
            .ok_or(Error::CorruptObject("commit ends after tree line"))?;
        while let Some(hex) = line.strip_prefix(b"parent ") {
            if parent.is_none() {
                let hex = std::str::from_utf8(hex)
                    .map_err(|_| Error::CorruptObject("commit parent id is not utf-8"))?;
                parent = Some(Digest::from_str(hex)?);
            }
            line = lines
                .next()
                .ok_or(Error::CorruptObject("commit ends in parent lines"))?;
        }

        let author = Signature::parse(line)?;
        let committer = Signature::parse(
            lines
                .next()
                .ok_or(Error::CorruptObject("commit has no committer line"))?,
        )?;

        // Everything up to the blank separator is header we don't model.
        for line in &mut lines {
            if line.is_empty() {
                break;
            }
        }

        let message: Vec<&[u8]> = lines.collect();
        let message = message.join(&b'\n');
        let mut message = String::from_utf8(message)
            .map_err(|_| Error::CorruptObject("commit message is not utf-8"))?;
        if message.ends_with('\n') {
            message.pop();
        }

        Ok(Self {
            tree_id,
            parent,
            author,
            committer,
            message,
        })
    }
}

impl Signature {
    /// Parse a signature line from a commit.
    ///
    /// ## Example
    /// `author Gitlet <gitlet@example.com> 1658312219 +0000`
    fn parse(bytes: &[u8]) -> Result<Self> {
        static REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(?:author|committer) ([^<]+) <([^>]*)> (\d+) ((?:\+|-)\d{4})$").unwrap()
        });

        let groups = REGEX
            .captures(bytes)
            .ok_or(Error::CorruptObject("malformed signature line"))?;

        let name = std::str::from_utf8(&groups[1])
            .map_err(|_| Error::CorruptObject("signature name is not utf-8"))?
            .trim_end()
            .to_owned();
        let email = std::str::from_utf8(&groups[2])
            .map_err(|_| Error::CorruptObject("signature email is not utf-8"))?
            .to_owned();
        let unix = std::str::from_utf8(&groups[3])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::CorruptObject("signature timestamp is not a number"))?;

        // The zone offset (group 4) is matched but not retained; commits
        // this crate writes are always +0000.
        Ok(Self {
            name,
            email,
            when: Timestamp { unix },
        })
    }
}
