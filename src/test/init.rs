use camino::Utf8Path;
use tempdir::TempDir;

use crate::repo::Repo;
use crate::Result;

#[test]
fn init_creates_repo_layout() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();

    Repo::init(root)?;

    let git_dir = root.join(".git");
    assert!(git_dir.is_dir());
    assert!(git_dir.join("objects").is_dir());
    assert!(git_dir.join("refs").is_dir());
    assert_eq!(
        std::fs::read_to_string(git_dir.join("HEAD"))?,
        "ref: refs/heads/main\n"
    );

    Ok(())
}

#[test]
fn init_twice_is_harmless() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();

    Repo::init(root)?;
    std::fs::write(root.join(".git/HEAD"), "ref: refs/heads/other\n")?;
    Repo::init(root)?;

    // The second init must not have clobbered anything.
    assert_eq!(
        std::fs::read_to_string(root.join(".git/HEAD"))?,
        "ref: refs/heads/other\n"
    );

    Ok(())
}

#[test]
fn open_requires_a_repo() {
    let dir = TempDir::new("").unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();

    assert!(Repo::open(root.to_owned()).is_err());
}
