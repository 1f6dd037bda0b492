#[cfg(test)]
mod test;

mod checkout;
mod commit;
mod compress;
mod database;
mod digest;
mod error;
mod filemode;
mod interface;
mod pack;
mod repo;
mod transport;
mod tree;
mod util;

use std::io::Write;

use color_eyre::eyre::Context;
pub use color_eyre::Result;

use camino::Utf8PathBuf;
use clap::Parser;
use once_cell::sync::Lazy;
use tracing_subscriber::prelude::*;

use crate::commit::Commit;
use crate::database::ObjectKind;
use crate::interface::{CatFile, Command, Opt};
use crate::repo::Repo;
use crate::tree::Tree;

static ARGS: Lazy<Opt> = Lazy::new(Opt::parse);

fn main() -> Result<()> {
    color_eyre::install().unwrap();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Lazy::force(&ARGS);

    let path = match ARGS.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => Utf8PathBuf::try_from(std::env::current_dir()?)?,
    };

    match &ARGS.command {
        Command::Init => {
            Repo::init(&path)?;
            println!("Initialized git directory");
        }
        Command::HashObject { write, file } => {
            let oid = if *write {
                Repo::open(path)?.hash_object(file)?
            } else {
                let data = std::fs::read(file)?;
                database::object_id(ObjectKind::Blob, &data)
            };
            println!("{}", oid.to_hex());
        }
        Command::CatFile(args) => {
            let repo = Repo::open(path)?;
            match args {
                CatFile::PrettyPrint { object } => {
                    let loaded = repo.database.read(object)?;
                    match loaded.kind {
                        ObjectKind::Tree => Tree::parse(&loaded.payload)?.pretty_print(),
                        ObjectKind::Commit => Commit::parse(&loaded.payload)?.pretty_print(),
                        ObjectKind::Blob | ObjectKind::Tag => {
                            let mut stdout = std::io::stdout().lock();
                            stdout.write_all(&loaded.payload)?;
                            stdout.flush()?;
                        }
                    }
                }
                CatFile::Type { object } => println!("{}", repo.database.read(object)?.kind),
                CatFile::Size { object } => println!("{}", repo.database.read(object)?.size()),
            }
        }
        Command::LsTree { name_only, tree } => {
            let repo = Repo::open(path)?;
            let object = repo.database.read(tree)?.require(ObjectKind::Tree)?;
            let tree = Tree::parse(&object.payload)?;
            if *name_only {
                tree.print_names();
            } else {
                tree.pretty_print();
            }
        }
        Command::WriteTree => {
            let oid = Repo::open(path)?.write_tree()?;
            println!("{}", oid.to_hex());
        }
        Command::CommitTree {
            tree,
            parent,
            message,
        } => {
            let oid = Repo::open(path)?.commit_tree(tree.clone(), parent.clone(), message)?;
            println!("{}", oid.to_hex());
        }
        Command::Clone { url, directory } => {
            Repo::clone(url, directory)?;
        }
    }
    Ok(())
}
