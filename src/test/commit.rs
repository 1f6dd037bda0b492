use camino::Utf8Path;
use pretty_assertions::assert_eq;
use tempdir::TempDir;

use crate::commit::{Commit, AUTHOR_EMAIL, AUTHOR_NAME};
use crate::database::ObjectKind;
use crate::repo::Repo;
use crate::Result;

#[test]
fn commit_tree_round_trip() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();
    Repo::init(root)?;
    let repo = Repo::open(root.to_owned())?;

    crate::create_test_files!(root, ["file1", "sub/file2"]);
    let tree_id = repo.write_tree()?;

    let first = repo.commit_tree(tree_id.clone(), None, "initial commit")?;
    let loaded = repo.database.read(&first)?.require(ObjectKind::Commit)?;
    let text = String::from_utf8(loaded.payload.clone()).unwrap();

    // A root commit has a tree line and no parent line.
    assert!(text.starts_with(&format!("tree {}\n", tree_id.to_hex())));
    assert!(!text.contains("parent"));
    assert!(text.contains(&format!("author {AUTHOR_NAME} <{AUTHOR_EMAIL}> ")));

    let commit = Commit::parse(&loaded.payload)?;
    assert_eq!(commit.tree_id(), &tree_id);
    assert_eq!(commit.parent(), None);
    assert_eq!(commit.message(), "initial commit");

    // A child commit carries both lines, tree first.
    let second = repo.commit_tree(tree_id.clone(), Some(first.clone()), "second commit")?;
    let loaded = repo.database.read(&second)?.require(ObjectKind::Commit)?;
    let text = String::from_utf8(loaded.payload.clone()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], format!("tree {}", tree_id.to_hex()));
    assert_eq!(lines[1], format!("parent {}", first.to_hex()));

    let commit = Commit::parse(&loaded.payload)?;
    assert_eq!(commit.parent(), Some(&first));
    assert_eq!(commit.message(), "second commit");

    Ok(())
}
