mod parse;
mod write;

use camino::Utf8Path;
use tracing::*;

use crate::database::{Database, ObjectKind};
use crate::digest::Digest;
use crate::error::Result;
use crate::filemode::FileMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    oid: Digest,
}

impl TreeEntry {
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> &Digest {
        &self.oid
    }
}

/// A directory listing. Entries are kept in the order they were parsed or
/// built, which is always byte-wise name order for trees this crate writes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot `dir` into the database: every regular file becomes a blob,
    /// every subdirectory a subtree, bottom-up. Returns the root tree id.
    ///
    /// `.git` is never descended into; special files (sockets, symlinks,
    /// fifos) are skipped.
    pub fn write_from_directory(database: &Database, dir: &Utf8Path) -> Result<Digest> {
        let mut entries = Vec::new();

        for dirent in dir.read_dir_utf8()? {
            let dirent = dirent?;
            let name = dirent.file_name().to_owned();
            if name == ".git" {
                continue;
            }

            let metadata = dirent.metadata()?;
            if metadata.is_dir() {
                let oid = Self::write_from_directory(database, dirent.path())?;
                entries.push(TreeEntry {
                    mode: FileMode::DIRECTORY,
                    name,
                    oid,
                });
            } else if metadata.is_file() {
                let data = std::fs::read(dirent.path())?;
                let oid = database.write(ObjectKind::Blob, &data)?;
                entries.push(TreeEntry {
                    mode: FileMode::from_metadata(&metadata),
                    name,
                    oid,
                });
            } else {
                trace!(path = %dirent.path(), "Skipping special file");
            }
        }

        entries.sort_unstable_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        let tree = Tree { entries };
        database.write(ObjectKind::Tree, &tree.encode())
    }

    /// Print entries the way `ls-tree` does: mode, kind, id, then name.
    pub fn pretty_print(&self) {
        for entry in &self.entries {
            let kind = if entry.mode.is_directory() {
                "tree"
            } else {
                "blob"
            };
            println!("{:o} {} {:x}\t{}", entry.mode, kind, entry.oid, entry.name);
        }
    }

    pub fn print_names(&self) {
        for entry in &self.entries {
            println!("{}", entry.name);
        }
    }
}
