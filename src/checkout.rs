//! Materialize a stored tree onto the filesystem.

use std::io::ErrorKind;

use camino::Utf8Path;
use tracing::*;

use crate::database::{Database, ObjectKind};
use crate::digest::Digest;
use crate::error::Result;
use crate::tree::Tree;

/// Recreate the directory structure and file contents of `tree_id` under
/// `target`, which must already exist. Recursion depth equals tree depth;
/// cycles are impossible since a tree's id is a hash of its fully-determined
/// content.
pub fn checkout(database: &Database, tree_id: &Digest, target: &Utf8Path) -> Result<()> {
    trace!(tree = %tree_id.short(), %target, "Checking out tree");
    let object = database.read(tree_id)?.require(ObjectKind::Tree)?;
    let tree = Tree::parse(&object.payload)?;

    for entry in tree.entries() {
        let path = target.join(entry.name());
        if entry.mode().is_directory() {
            match std::fs::create_dir(&path) {
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                other => other?,
            }
            checkout(database, entry.oid(), &path)?;
        } else {
            let blob = database.read(entry.oid())?.require(ObjectKind::Blob)?;
            std::fs::write(&path, &blob.payload)?;
        }
    }

    Ok(())
}
