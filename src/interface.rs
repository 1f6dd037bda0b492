use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use crate::digest::Digest;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init,

    /// Compute a file's blob id, optionally writing the blob to the database
    HashObject {
        /// Write the object to the database, not just compute its id
        #[clap(short = 'w')]
        write: bool,

        file: Utf8PathBuf,
    },

    #[clap(subcommand)]
    CatFile(CatFile),

    /// List the entries of a tree object
    LsTree {
        /// Print only entry names
        #[clap(long)]
        name_only: bool,

        #[clap(value_name = "tree")]
        tree: Digest,
    },

    /// Store the working directory as a tree object and print its id
    WriteTree,

    /// Create a commit object for an already-stored tree
    CommitTree {
        #[clap(value_name = "tree")]
        tree: Digest,

        /// The parent commit, if there is one
        #[clap(short)]
        parent: Option<Digest>,

        #[clap(short, env = "GITLET_COMMIT_MESSAGE")]
        message: String,
    },

    /// Fetch a remote repository and check out its head commit
    Clone {
        url: String,
        directory: Utf8PathBuf,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum CatFile {
    /// Pretty-print the contents of `object` based on its type
    #[clap(short_flag = 'p')]
    PrettyPrint {
        #[clap(value_name = "object")]
        object: Digest,
    },

    /// Print the type of `object` to stdout
    #[clap(short_flag = 't')]
    Type {
        #[clap(value_name = "object")]
        object: Digest,
    },

    /// Print the size of `object` to stdout
    #[clap(short_flag = 's')]
    Size {
        #[clap(value_name = "object")]
        object: Digest,
    },
}

#[derive(Debug, Parser)]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// The path to the repository root.
    #[clap(short)]
    pub path: Option<Utf8PathBuf>,
}
