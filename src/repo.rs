use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::eyre;
use tracing::*;

use crate::checkout;
use crate::commit::Commit;
use crate::database::{Database, ObjectKind};
use crate::digest::Digest;
use crate::pack;
use crate::transport;
use crate::tree::Tree;
use crate::Result;

pub struct Repo {
    dir: Utf8PathBuf,
    pub database: Database,
}

impl Repo {
    /// Create the repository skeleton: `.git/objects`, `.git/refs`, and a
    /// HEAD pointing at an as-yet-unborn main branch.
    pub fn init(path: &Utf8Path) -> Result<()> {
        trace!(%path, "Initialising repo");
        let git_dir = path.join(".git");
        if git_dir.exists() {
            warn!("Repo already exists, init will do nothing");
            return Ok(());
        }

        for d in ["objects", "refs"] {
            let dir = git_dir.join(d);
            trace!(path = %dir, "Creating directory");
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n")?;

        Ok(())
    }

    pub fn open(path: Utf8PathBuf) -> Result<Self> {
        if !path.join(".git").is_dir() {
            return Err(eyre!("not a git repository: '{path}'"));
        }
        let database = Database::new(path.join(".git"));
        trace!(%path, "Opened repo");
        Ok(Self {
            dir: path,
            database,
        })
    }

    /// Store a file's contents as a blob, returning its id.
    pub fn hash_object(&self, file: &Utf8Path) -> Result<Digest> {
        let data = std::fs::read(file)?;
        Ok(self.database.write(ObjectKind::Blob, &data)?)
    }

    /// Snapshot the working directory as a tree, returning the root tree id.
    pub fn write_tree(&self) -> Result<Digest> {
        Ok(Tree::write_from_directory(&self.database, &self.dir)?)
    }

    /// Create a commit object for an already-stored tree.
    pub fn commit_tree(
        &self,
        tree_id: Digest,
        parent: Option<Digest>,
        message: &str,
    ) -> Result<Digest> {
        let commit = Commit::new(tree_id, parent, message);
        Ok(self.database.write(ObjectKind::Commit, &commit.encode())?)
    }

    /// Fetch a remote repository into `target` and check out its head
    /// commit: init, refs advertisement, pack fetch, pack decode, checkout.
    pub fn clone(url: &str, target: &Utf8Path) -> Result<Repo> {
        info!(%url, %target, "Cloning");
        std::fs::create_dir_all(target)?;
        Repo::init(target)?;
        let repo = Repo::open(target.to_owned())?;

        let refs = transport::fetch_refs(url)?;
        let head = transport::head_commit(&refs)
            .ok_or_else(|| eyre!("no commit id in refs advertisement from '{url}'"))?;
        let data = transport::fetch_pack(url, &head)?;

        let summary = pack::unpack(&repo.database, &data)?;
        info!(stored = summary.stored, "Pack decoded");
        if summary.skipped > 0 {
            warn!(
                skipped = summary.skipped,
                "Some pack entries could not be materialized; the checkout may be incomplete"
            );
        }

        let commit = repo.database.read(&head)?.require(ObjectKind::Commit)?;
        let commit = Commit::parse(&commit.payload)?;
        checkout::checkout(&repo.database, commit.tree_id(), target)?;

        Ok(repo)
    }
}
