mod content;
mod list;
mod show;

use anyhow::Result;
use clap::Subcommand;
use nsite_content::ContentService;
use serde::Serialize;

use crate::exit::Exit;

pub trait Command {
    async fn execute(&self, service: &ContentService) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum NsiteCommand {
    /// List published documents, newest first
    List(self::list::List),
    /// Show one published document by its slug
    Show(self::show::Show),
    /// Print the block tree of a page
    Content(self::content::Content),
}

impl Command for NsiteCommand {
    async fn execute(&self, service: &ContentService) -> Result<Exit> {
        match self {
            Self::List(cmd) => cmd.execute(service).await,
            Self::Show(cmd) => cmd.execute(service).await,
            Self::Content(cmd) => cmd.execute(service).await,
        }
    }
}

/// Pretty JSON on stdout, the one output format of every command.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
