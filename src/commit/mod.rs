mod parse;
mod write;

use std::fmt::Display;

use crate::digest::Digest;

/// Identity recorded on every commit this binary writes. Commit identity is
/// a build-time constant, not taken from the environment.
pub const AUTHOR_NAME: &str = "Gitlet";
pub const AUTHOR_EMAIL: &str = "gitlet@example.com";

/// Seconds since the unix epoch. Commits always record a UTC offset of
/// `+0000`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Timestamp {
    unix: i64,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            unix: chrono::offset::Utc::now().timestamp(),
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} +0000", self.unix)
    }
}

#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    email: String,
    when: Timestamp,
}

impl Signature {
    fn fixed(when: Timestamp) -> Self {
        Self {
            name: AUTHOR_NAME.to_owned(),
            email: AUTHOR_EMAIL.to_owned(),
            when,
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.when)
    }
}

#[derive(Debug)]
pub struct Commit {
    tree_id: Digest,
    parent: Option<Digest>,
    author: Signature,
    committer: Signature,
    message: String,
}

impl Commit {
    /// Assemble a commit. The timestamp is captured once, here, so author
    /// and committer always agree. At most one parent; merge commits are
    /// not supported.
    pub fn new(tree_id: Digest, parent: Option<Digest>, message: &str) -> Self {
        let author = Signature::fixed(Timestamp::now());
        let committer = author.clone();

        Commit {
            tree_id,
            parent,
            author,
            committer,
            message: message.to_owned(),
        }
    }

    pub fn tree_id(&self) -> &Digest {
        &self.tree_id
    }

    pub fn parent(&self) -> Option<&Digest> {
        self.parent.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pretty_print(&self) {
        println!("tree {:x}", self.tree_id);
        if let Some(parent) = &self.parent {
            println!("parent {parent:x}");
        }
        println!("author {}", self.author);
        println!("committer {}", self.committer);
        println!();
        println!("{}", self.message);
    }
}
