use crate::database::ObjectKind;
use crate::digest::Digest;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures the object engine can report. Anything outside these kinds is a
/// plain I/O error carrying the OS reason.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found in database: {0:x}")]
    ObjectNotFound(Digest),

    #[error("corrupt object: {0}")]
    CorruptObject(&'static str),

    #[error("corrupt zlib stream: {0}")]
    CorruptStream(#[source] std::io::Error),

    #[error("malformed object id: {0}")]
    MalformedId(#[from] hex::FromHexError),

    #[error("no PACK signature in pack data")]
    InvalidPackSignature,

    #[error("pack data ended unexpectedly while reading {0}")]
    TruncatedPack(&'static str),

    #[error("expected a {expected} object, found {found}")]
    WrongObjectKind {
        expected: ObjectKind,
        found: ObjectKind,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
