//! The two-request "smart protocol" exchange. This is glue around the core:
//! it returns complete raw byte buffers and owns all network policy. The
//! decoder never sees a socket.

use std::str::FromStr;

use tracing::*;

use crate::digest::Digest;
use crate::Result;

/// Fetch the refs advertisement for a repository.
pub fn fetch_refs(url: &str) -> Result<Vec<u8>> {
    let full_url = format!("{url}/info/refs?service=git-upload-pack");
    debug!(%full_url, "Requesting refs advertisement");
    let response = reqwest::blocking::get(full_url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Fetch the pack for a single wanted commit.
pub fn fetch_pack(url: &str, want: &Digest) -> Result<Vec<u8>> {
    debug!(%url, want = %want.short(), "Requesting pack");
    let body = format!("0032want {}\n00000009done\n", want.to_hex());
    let response = reqwest::blocking::Client::new()
        .post(format!("{url}/git-upload-pack"))
        .header("Content-Type", "application/x-git-upload-pack-request")
        .body(body)
        .send()?
        .error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Extract the commit id to fetch from a refs advertisement.
///
/// Advertisement lines look like `<pkt-len><40-hex-id> <refname>`, so the id
/// is the 40 bytes ending one byte before the ref name. The default branch
/// heads are preferred, falling back to the HEAD line.
pub fn head_commit(refs: &[u8]) -> Option<Digest> {
    for needle in [&b"refs/heads/master"[..], &b"refs/heads/main"[..], &b"HEAD"[..]] {
        if let Some(idx) = memchr::memmem::find(refs, needle) {
            let Some(start) = idx.checked_sub(41) else {
                continue;
            };
            let Ok(hex) = std::str::from_utf8(&refs[start..idx - 1]) else {
                continue;
            };
            if let Ok(oid) = Digest::from_str(hex) {
                return Some(oid);
            }
        }
    }
    None
}
